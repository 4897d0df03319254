//! State upgrades between schema versions
//!
//! A resource whose schema version is bumped registers one [`StateUpgrade`]
//! per prior version. Each upgrader converts directly from its registered
//! version to the current one; upgraders are never chained.

use crate::context::Context;
use crate::error::{Result, TfplugError};
use crate::resource::{UpgradeResourceStateRequest, UpgradeResourceStateResponse};
use crate::schema::Schema;
use crate::types::{Diagnostic, Dynamic, DynamicValue};
use std::collections::BTreeMap;

/// Untyped state as written by an older schema version
pub type RawStateMap = serde_json::Map<String, serde_json::Value>;

/// Converts stored state from one prior schema version to the current one.
///
/// `M` is the provider's configured data; it is `None` when the host upgrades
/// state before the provider has been configured.
pub trait StateUpgrade<M>: Send + Sync {
    /// Attribute shape of the prior version
    fn schema(&self) -> Schema;

    fn upgrade(&self, ctx: &Context, raw_state: RawStateMap, meta: Option<&M>)
        -> Result<RawStateMap>;
}

/// Upgraders keyed by the schema version they upgrade from
pub struct StateUpgraders<M> {
    upgraders: BTreeMap<i64, Box<dyn StateUpgrade<M>>>,
}

impl<M> StateUpgraders<M> {
    pub fn new() -> Self {
        Self {
            upgraders: BTreeMap::new(),
        }
    }

    pub fn register(mut self, version: i64, upgrader: impl StateUpgrade<M> + 'static) -> Self {
        self.upgraders.insert(version, Box::new(upgrader));
        self
    }

    pub fn get(&self, version: i64) -> Option<&dyn StateUpgrade<M>> {
        self.upgraders.get(&version).map(|u| u.as_ref())
    }

    pub fn versions(&self) -> Vec<i64> {
        self.upgraders.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.upgraders.is_empty()
    }
}

impl<M> Default for StateUpgraders<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Upgrades `request.raw_state` to `current_version`.
///
/// Same version returns the stored state as is. A lower version runs the
/// single upgrader registered for it. Anything else, or an upgrader failure,
/// yields an error diagnostic and a null state.
pub fn upgrade_resource_state<M>(
    ctx: &Context,
    request: &UpgradeResourceStateRequest,
    current_version: i64,
    upgraders: &StateUpgraders<M>,
    meta: Option<&M>,
) -> UpgradeResourceStateResponse {
    match run_upgrade(ctx, request, current_version, upgraders, meta) {
        Ok(state) => UpgradeResourceStateResponse {
            upgraded_state: DynamicValue::new(Dynamic::from(serde_json::Value::Object(state))),
            diagnostics: vec![],
        },
        Err(e) => {
            tracing::error!(
                type_name = %request.type_name,
                from_version = request.version,
                to_version = current_version,
                "State upgrade failed: {}",
                e
            );
            UpgradeResourceStateResponse {
                upgraded_state: DynamicValue::null(),
                diagnostics: vec![Diagnostic::error(
                    "Unable to upgrade resource state",
                    format!(
                        "upgrading {} state from schema version {} to {}: {}",
                        request.type_name, request.version, current_version, e
                    ),
                )],
            }
        }
    }
}

fn run_upgrade<M>(
    ctx: &Context,
    request: &UpgradeResourceStateRequest,
    current_version: i64,
    upgraders: &StateUpgraders<M>,
    meta: Option<&M>,
) -> Result<RawStateMap> {
    if ctx.is_cancelled() {
        return Err(TfplugError::Cancelled);
    }

    let raw_state = request.raw_state.to_map()?;

    if request.version == current_version {
        tracing::debug!(
            type_name = %request.type_name,
            version = current_version,
            "Stored state already at current schema version"
        );
        return Ok(raw_state);
    }

    if request.version > current_version {
        return Err(TfplugError::UpgradeFailed(format!(
            "state was written by a newer provider (schema version {}, this provider supports {})",
            request.version, current_version
        )));
    }

    let upgrader = upgraders.get(request.version).ok_or_else(|| {
        TfplugError::UpgradeFailed(format!(
            "no state upgrader registered for schema version {}",
            request.version
        ))
    })?;

    tracing::debug!(
        type_name = %request.type_name,
        from_version = request.version,
        to_version = current_version,
        keys = raw_state.len(),
        "Upgrading resource state"
    );

    upgrader.upgrade(ctx, raw_state, meta)
}
