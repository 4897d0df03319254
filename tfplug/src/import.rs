//! Import helpers for simplifying resource import implementations

use crate::context::Context;
use crate::resource::{ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource};
use crate::types::{AttributePath, Diagnostic, DynamicValue};
use std::fmt::Display;

/// Sets the import ID to a specific attribute in state
///
/// Example: ID "/subscriptions/.../watchlists/w1" -> state.id = "/subscriptions/.../watchlists/w1"
pub fn import_state_passthrough_id(
    _ctx: &Context,
    attr_path: AttributePath,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) {
    let mut state = DynamicValue::empty_object();

    if let Err(e) = state.set_string(&attr_path, request.id.clone()) {
        response.diagnostics.push(
            Diagnostic::error(
                format!("Failed to set import ID: {}", e),
                format!("Could not set attribute '{}' to value '{}'", attr_path, request.id),
            )
            .with_attribute(attr_path),
        );
        return;
    }

    response.imported_resources.push(ImportedResource {
        type_name: request.type_name.clone(),
        state,
    });
}

/// Runs `validate` over the import ID before seeding `id` in state.
///
/// A rejected ID becomes an error diagnostic and nothing is imported.
pub fn import_state_validating_id<F, E>(
    ctx: &Context,
    validate: F,
    request: &ImportResourceStateRequest,
    response: &mut ImportResourceStateResponse,
) where
    F: Fn(&str) -> std::result::Result<(), E>,
    E: Display,
{
    tracing::debug!(type_name = %request.type_name, id = %request.id, "Validating import ID");

    if let Err(e) = validate(&request.id) {
        response.diagnostics.push(
            Diagnostic::error(
                "Invalid import ID",
                format!("parsing Resource ID {:?}: {}", request.id, e),
            )
            .with_attribute(AttributePath::new("id")),
        );
        return;
    }

    import_state_passthrough_id(ctx, AttributePath::new("id"), request, response);
}
