//! Managed resource lifecycle
//!
//! A provider hands out resources through factories; the host configures each
//! one with the provider data and then drives plan/apply through [`Resource`].
//! State upgrades and import are opt-in extension traits.
//!
//! Handlers never fail: every problem is reported as a [`Diagnostic`] in the
//! response, alongside whatever state is still accurate.

use crate::context::Context;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue, RawState};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

#[async_trait]
pub trait Resource: Send + Sync {
    /// Constant type name, e.g. "azurerm_sentinel_watchlist". Must equal the
    /// key the provider registers the factory under.
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse;

    async fn schema(&self, ctx: Context, request: ResourceSchemaRequest) -> ResourceSchemaResponse;

    /// Plan-time check of the configuration. No remote calls.
    async fn validate(
        &self,
        ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse;

    /// Creates the remote object. `new_state` must carry every computed
    /// attribute, `id` included.
    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse;

    /// Refreshes state from the remote object
    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse;

    /// Removes the remote object. An object that is already gone is not an error.
    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse;
}

#[derive(Debug, Default)]
pub struct ResourceMetadataRequest;

#[derive(Debug)]
pub struct ResourceMetadataResponse {
    pub type_name: String,
}

#[derive(Debug, Default)]
pub struct ResourceSchemaRequest;

#[derive(Debug)]
pub struct ResourceSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct ValidateResourceConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

#[derive(Debug, Default)]
pub struct ValidateResourceConfigResponse {
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct CreateResourceRequest {
    pub type_name: String,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
}

#[derive(Debug)]
pub struct CreateResourceResponse {
    pub new_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct ReadResourceRequest {
    pub type_name: String,
    pub current_state: DynamicValue,
}

#[derive(Debug)]
pub struct ReadResourceResponse {
    /// None when the remote object is gone and the state should be dropped
    pub new_state: Option<DynamicValue>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadResourceResponse {
    /// The remote object no longer exists
    pub fn removed() -> Self {
        Self {
            new_state: None,
            diagnostics: vec![],
        }
    }
}

#[derive(Debug)]
pub struct UpdateResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
    pub planned_state: DynamicValue,
    pub config: DynamicValue,
}

#[derive(Debug)]
pub struct UpdateResourceResponse {
    pub new_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct DeleteResourceRequest {
    pub type_name: String,
    pub prior_state: DynamicValue,
}

#[derive(Debug, Default)]
pub struct DeleteResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// Receives the provider data right after the factory builds the resource
#[async_trait]
pub trait ResourceWithConfigure: Resource {
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse;
}

#[derive(Debug, Default)]
pub struct ConfigureResourceRequest {
    /// `ConfigureProviderResponse::provider_data`, to be downcast by the resource
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

#[derive(Debug, Default)]
pub struct ConfigureResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// Migrates state written under an older `Schema::version`.
///
/// Only called when the stored version differs from the current one.
/// Implementations normally register their upgraders and hand off to
/// [`crate::upgrade::upgrade_resource_state`].
#[async_trait]
pub trait ResourceWithUpgradeState: Resource {
    async fn upgrade_state(
        &self,
        ctx: Context,
        request: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse;
}

#[derive(Debug)]
pub struct UpgradeResourceStateRequest {
    pub type_name: String,
    /// Schema version the state was written with
    pub version: i64,
    pub raw_state: RawState,
}

#[derive(Debug)]
pub struct UpgradeResourceStateResponse {
    pub upgraded_state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

/// Adopts an existing remote object by ID. The imported state only needs `id`;
/// the following read fills in the rest.
#[async_trait]
pub trait ResourceWithImportState: Resource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse;
}

#[derive(Debug)]
pub struct ImportResourceStateRequest {
    pub type_name: String,
    pub id: String,
}

#[derive(Debug, Default)]
pub struct ImportResourceStateResponse {
    pub imported_resources: Vec<ImportedResource>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct ImportedResource {
    pub type_name: String,
    pub state: DynamicValue,
}
