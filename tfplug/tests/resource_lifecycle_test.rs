//! Tests for the resource traits, per-operation timeouts and state upgrades

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory,
    ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
};
use tfplug::resource::*;
use tfplug::types::RawState;
use tfplug::upgrade::RawStateMap;
use tfplug::{
    AttributeBuilder, AttributePath, AttributeType, Context, Diagnostic, DynamicValue, Operation,
    Provider, ProviderMetadataRequest, ProviderMetadataResponse, ResourceTimeouts, Result,
    Schema, SchemaBuilder, StateUpgrade, StateUpgraders, TfplugError,
};

#[derive(Clone)]
struct FakeProviderData {
    label: String,
}

/// Sleeps for `delay_ms` on create, bounded by the create timeout
#[derive(Default)]
struct SlowResource {
    timeouts: ResourceTimeouts,
    provider_data: Option<FakeProviderData>,
}

struct RenameNameV0;

impl StateUpgrade<FakeProviderData> for RenameNameV0 {
    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .attribute(AttributeBuilder::new("name", AttributeType::String).build())
            .build()
    }

    fn upgrade(
        &self,
        _ctx: &Context,
        mut raw_state: RawStateMap,
        meta: Option<&FakeProviderData>,
    ) -> Result<RawStateMap> {
        if let Some(name) = raw_state.remove("name") {
            raw_state.insert("display_name".to_string(), name);
        }
        if let Some(meta) = meta {
            raw_state.insert("label".to_string(), meta.label.clone().into());
        }
        Ok(raw_state)
    }
}

#[async_trait]
impl Resource for SlowResource {
    fn type_name(&self) -> &str {
        "test_slow"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: SchemaBuilder::new()
                .version(1)
                .attribute(
                    AttributeBuilder::new("delay_ms", AttributeType::Number)
                        .required()
                        .build(),
                )
                .build(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = vec![];
        let delay_ms = request
            .config
            .get_number(&AttributePath::new("delay_ms"))
            .unwrap_or(0.0) as u64;

        let ctx = self.timeouts.context_for(ctx, Operation::Create);
        match ctx
            .run(tokio::time::sleep(Duration::from_millis(delay_ms)))
            .await
        {
            Ok(()) => {
                let mut state = request.planned_state;
                state
                    .set_string(&AttributePath::new("id"), "test-id".to_string())
                    .unwrap();
                CreateResourceResponse {
                    new_state: state,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error("Operation timed out", e.to_string()));
                CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                }
            }
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        ReadResourceResponse {
            new_state: Some(request.current_state),
            diagnostics: vec![],
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.planned_state,
            diagnostics: vec![],
        }
    }

    async fn delete(&self, _ctx: Context, _request: DeleteResourceRequest) -> DeleteResourceResponse {
        DeleteResourceResponse {
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for SlowResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];
        match request
            .provider_data
            .as_ref()
            .and_then(|data| data.downcast_ref::<FakeProviderData>())
        {
            Some(data) => self.provider_data = Some(data.clone()),
            None => diagnostics.push(Diagnostic::error(
                "Invalid provider data",
                "Failed to extract FakeProviderData from provider data",
            )),
        }
        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithUpgradeState for SlowResource {
    async fn upgrade_state(
        &self,
        ctx: Context,
        request: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse {
        let upgraders = StateUpgraders::new().register(0, RenameNameV0);
        tfplug::upgrade_resource_state(&ctx, &request, 1, &upgraders, self.provider_data.as_ref())
    }
}

fn slow_resource() -> Box<dyn ResourceWithConfigure> {
    Box::new(SlowResource::default())
}

struct TestProvider;

#[async_trait]
impl Provider for TestProvider {
    fn type_name(&self) -> &str {
        "test"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: SchemaBuilder::new().build(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        _request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let data: Arc<dyn Any + Send + Sync> = Arc::new(FakeProviderData {
            label: "configured".to_string(),
        });
        ConfigureProviderResponse {
            diagnostics: vec![],
            provider_data: Some(data),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
        resources.insert("test_slow".to_string(), slow_resource as ResourceFactory);
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        HashMap::new()
    }
}

fn config_with_delay(delay_ms: f64) -> DynamicValue {
    let mut config = DynamicValue::empty_object();
    config
        .set_number(&AttributePath::new("delay_ms"), delay_ms)
        .unwrap();
    config
}

#[tokio::test]
async fn create_completes_within_timeout() {
    let resource = SlowResource::default();
    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "test_slow".to_string(),
                planned_state: config_with_delay(10.0),
                config: config_with_delay(10.0),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert_eq!(
        response
            .new_state
            .get_string(&AttributePath::new("id"))
            .unwrap(),
        "test-id"
    );
}

#[tokio::test]
async fn create_is_cut_short_by_create_timeout() {
    let resource = SlowResource {
        timeouts: ResourceTimeouts::new(
            Duration::from_millis(20),
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_secs(1),
        ),
        provider_data: None,
    };

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "test_slow".to_string(),
                planned_state: config_with_delay(5_000.0),
                config: config_with_delay(5_000.0),
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(
        response.diagnostics[0].detail,
        TfplugError::Cancelled.to_string()
    );
}

#[tokio::test]
async fn provider_data_flows_from_configure_into_upgrades() {
    let mut provider = TestProvider;
    let configured = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                config: DynamicValue::empty_object(),
            },
        )
        .await;

    let factory = provider.resources()["test_slow"];
    let mut resource = factory();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: configured.provider_data,
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());

    let mut concrete = SlowResource::default();
    concrete
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(Arc::new(FakeProviderData {
                    label: "configured".to_string(),
                })),
            },
        )
        .await;

    let upgraded = concrete
        .upgrade_state(
            Context::new(),
            UpgradeResourceStateRequest {
                type_name: "test_slow".to_string(),
                version: 0,
                raw_state: RawState::from_json(br#"{"id":"x","name":"old"}"#.to_vec()),
            },
        )
        .await;

    assert!(upgraded.diagnostics.is_empty());
    let state = upgraded.upgraded_state;
    assert_eq!(state.get_string(&AttributePath::new("display_name")).unwrap(), "old");
    assert_eq!(state.get_string(&AttributePath::new("label")).unwrap(), "configured");
    assert!(state.get(&AttributePath::new("name")).is_err());
}

#[tokio::test]
async fn configure_rejects_foreign_provider_data() {
    let mut resource = SlowResource::default();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(Arc::new(42_u32)),
            },
        )
        .await;

    assert_eq!(response.diagnostics[0].summary, "Invalid provider data");
}

#[tokio::test]
async fn empty_raw_state_upgrades_to_empty_object() {
    let resource = SlowResource::default();
    let upgraded = resource
        .upgrade_state(
            Context::new(),
            UpgradeResourceStateRequest {
                type_name: "test_slow".to_string(),
                version: 0,
                raw_state: RawState::default(),
            },
        )
        .await;

    assert!(upgraded.diagnostics.is_empty());
    assert_eq!(upgraded.upgraded_state, DynamicValue::empty_object());
}
