//! tfplug - Terraform Plugin Framework for Rust
//!
//! The provider-facing half of a Terraform plugin framework: dynamic values,
//! schemas, validators, the resource/data source/provider traits, request
//! contexts with per-operation timeouts, and the state upgrade driver.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod timeouts;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod import;
pub mod upgrade;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use import::{import_state_passthrough_id, import_state_validating_id};
pub use provider::{Provider, ProviderMetadataRequest, ProviderMetadataResponse};
pub use resource::{
    Resource, ResourceWithConfigure, ResourceWithImportState, ResourceWithUpgradeState,
};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use timeouts::{Operation, ResourceTimeouts};
pub use types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
pub use upgrade::{upgrade_resource_state, RawStateMap, StateUpgrade, StateUpgraders};
pub use validator::{ValidateFunc, ValidateFuncValidator};
