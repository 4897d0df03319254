//! Sentinel watchlist resource
//!
//! Watchlists cannot be edited in place through this resource: every
//! argument forces a new watchlist.

use super::{
    api_error, not_configured, optional_dynamic, optional_string, provider_data_from,
    required_string, requires_import, set_attr, string_list, string_list_dynamic,
    validate_duration,
};
use crate::api::security_insights::WatchlistProperties;
use crate::ids::sentinel::validate_workspace_id;
use crate::ids::{WatchlistId, WorkspaceId};
use crate::migration::SentinelWatchlistV0ToV1;
use crate::provider_data::AzureProviderData;
use crate::resourceids::ResourceId;
use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_validating_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, ResourceWithUpgradeState, UpdateResourceRequest,
    UpdateResourceResponse, UpgradeResourceStateRequest, UpgradeResourceStateResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::timeouts::{Operation, ResourceTimeouts};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::upgrade::{upgrade_resource_state, StateUpgraders};
use tfplug::validator::{StringIsNotEmpty, ValidateFuncValidator};

const TYPE_NAME: &str = "azurerm_sentinel_watchlist";
const SCHEMA_VERSION: i64 = 1;
const WATCHLIST_PROVIDER: &str = "Microsoft";
const WATCHLIST_SOURCE: &str = "Local";

pub struct SentinelWatchlistResource {
    provider_data: Option<AzureProviderData>,
    timeouts: ResourceTimeouts,
}

impl Default for SentinelWatchlistResource {
    fn default() -> Self {
        Self::new()
    }
}

impl SentinelWatchlistResource {
    pub fn new() -> Self {
        Self {
            provider_data: None,
            timeouts: ResourceTimeouts::default(),
        }
    }
}

pub(crate) fn schema_definition() -> Schema {
    let required = |name: &str, description: &str| {
        AttributeBuilder::new(name, AttributeType::String)
            .description(description)
            .required()
            .requires_replace()
            .validator(Box::new(StringIsNotEmpty))
            .build()
    };

    SchemaBuilder::new()
        .version(SCHEMA_VERSION)
        .description("Manages a Sentinel watchlist")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("Watchlist ID")
                .computed()
                .build(),
        )
        .attribute(required("name", "Name of the watchlist"))
        .attribute(
            AttributeBuilder::new("log_analytics_workspace_id", AttributeType::String)
                .description("Workspace Sentinel is onboarded to")
                .required()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_workspace_id,
                    "must be a Log Analytics workspace ID",
                )))
                .build(),
        )
        .attribute(required("display_name", "Display name of the watchlist"))
        .attribute(required(
            "item_search_key",
            "Column used as the key when joining watchlist items",
        ))
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .optional()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("labels", AttributeType::List(Box::new(AttributeType::String)))
                .optional()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("default_duration", AttributeType::String)
                .description("ISO 8601 duration after which items expire")
                .optional()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_duration,
                    "must be an ISO 8601 duration",
                )))
                .build(),
        )
        .build()
}

fn extract_config(config: &DynamicValue) -> Result<(WatchlistId, WatchlistProperties), Diagnostic> {
    let workspace = WorkspaceId::parse(&required_string(config, "log_analytics_workspace_id")?)
        .map_err(|e| {
            Diagnostic::error("Invalid log_analytics_workspace_id", e.to_string())
                .with_attribute(AttributePath::new("log_analytics_workspace_id"))
        })?;

    let id = WatchlistId::new(
        workspace.subscription_id,
        workspace.resource_group_name,
        workspace.workspace_name,
        required_string(config, "name")?,
    );

    let properties = WatchlistProperties {
        display_name: required_string(config, "display_name")?,
        provider: WATCHLIST_PROVIDER.to_string(),
        source: Some(WATCHLIST_SOURCE.to_string()),
        items_search_key: required_string(config, "item_search_key")?,
        description: optional_string(config, "description"),
        labels: string_list(config, "labels"),
        default_duration: optional_string(config, "default_duration"),
    };

    Ok((id, properties))
}

fn stored_id(state: &DynamicValue) -> Result<WatchlistId, Diagnostic> {
    let raw = state
        .get_string(&AttributePath::new("id"))
        .unwrap_or_default();
    WatchlistId::parse(&raw).map_err(|e| Diagnostic::error("Invalid resource ID", e.to_string()))
}

#[async_trait]
impl Resource for SentinelWatchlistResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
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

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: schema_definition(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: schema_definition().validate_config(&request.config),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Create);
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let (id, properties) = match extract_config(&request.config) {
            Ok(parts) => parts,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let api = provider_data.client.security_insights();
        let watchlists = api.watchlists();

        match watchlists.get(&ctx, &id).await {
            Ok(_) => diagnostics.push(requires_import(TYPE_NAME, &id.id())),
            Err(e) if e.is_not_found() => {}
            Err(e) => diagnostics.push(api_error(
                format!("checking for presence of existing {}", id),
                &e,
            )),
        }
        if !diagnostics.is_empty() {
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        }

        tracing::debug!(id = %id.id(), "Creating Sentinel watchlist");

        let mut new_state = request.planned_state;
        match watchlists.create_or_update(&ctx, &id, properties).await {
            Ok(_) => set_attr(&mut new_state, "id", Dynamic::String(id.id())),
            Err(e) => diagnostics.push(api_error(format!("creating {}", id), &e)),
        }

        CreateResourceResponse {
            new_state,
            diagnostics,
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Read);

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![not_configured()],
                }
            }
        };

        let id = match stored_id(&request.current_state) {
            Ok(id) => id,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };

        let watchlist = match provider_data
            .client
            .security_insights()
            .watchlists()
            .get(&ctx, &id)
            .await
        {
            Ok(watchlist) => watchlist,
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %id.id(), "Sentinel watchlist was not found, removing from state");
                return ReadResourceResponse::removed();
            }
            Err(e) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![api_error(format!("retrieving {}", id), &e)],
                }
            }
        };

        let props = watchlist.properties;
        let mut state = request.current_state.clone();
        set_attr(&mut state, "id", Dynamic::String(id.id()));
        set_attr(&mut state, "name", Dynamic::String(id.watchlist_name.clone()));
        set_attr(
            &mut state,
            "log_analytics_workspace_id",
            Dynamic::String(id.workspace_id().id()),
        );
        set_attr(&mut state, "display_name", Dynamic::String(props.display_name));
        set_attr(
            &mut state,
            "item_search_key",
            Dynamic::String(props.items_search_key),
        );
        set_attr(&mut state, "description", optional_dynamic(props.description));
        if !props.labels.is_empty() {
            set_attr(&mut state, "labels", string_list_dynamic(&props.labels));
        }
        set_attr(
            &mut state,
            "default_duration",
            optional_dynamic(props.default_duration),
        );

        ReadResourceResponse {
            new_state: Some(state),
            diagnostics: vec![],
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        UpdateResourceResponse {
            new_state: request.planned_state,
            diagnostics: vec![],
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Delete);

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                return DeleteResourceResponse {
                    diagnostics: vec![not_configured()],
                }
            }
        };

        let id = match stored_id(&request.prior_state) {
            Ok(id) => id,
            Err(diag) => {
                return DeleteResourceResponse {
                    diagnostics: vec![diag],
                }
            }
        };

        let mut diagnostics = vec![];
        if let Err(e) = provider_data
            .client
            .security_insights()
            .watchlists()
            .delete(&ctx, &id)
            .await
        {
            diagnostics.push(api_error(format!("deleting {}", id), &e));
        }
        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for SentinelWatchlistResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let (provider_data, diagnostics) = provider_data_from(request.provider_data);
        if provider_data.is_some() {
            self.provider_data = provider_data;
        }
        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithUpgradeState for SentinelWatchlistResource {
    async fn upgrade_state(
        &self,
        ctx: Context,
        request: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse {
        let upgraders = StateUpgraders::new().register(0, SentinelWatchlistV0ToV1);
        upgrade_resource_state(
            &ctx,
            &request,
            SCHEMA_VERSION,
            &upgraders,
            self.provider_data.as_ref(),
        )
    }
}

#[async_trait]
impl ResourceWithImportState for SentinelWatchlistResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        import_state_validating_id(
            &ctx,
            |id| WatchlistId::parse(id).map(|_| ()),
            &request,
            &mut response,
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{object, provider_data, s};
    use mockito::{Matcher, Server};
    use std::sync::Arc;
    use tfplug::types::RawState;

    const WORKSPACE: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.OperationalInsights/workspaces/workspace1";

    fn watchlist_id() -> String {
        format!("{}/providers/Microsoft.SecurityInsights/watchlists/list1", WORKSPACE)
    }

    async fn configured(url: &str) -> SentinelWatchlistResource {
        let mut resource = SentinelWatchlistResource::new();
        resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new(provider_data(url))),
                },
            )
            .await;
        resource
    }

    fn config() -> DynamicValue {
        object(vec![
            ("name", s("list1")),
            ("log_analytics_workspace_id", s(WORKSPACE)),
            ("display_name", s("High value assets")),
            ("item_search_key", s("Hostname")),
            ("labels", Dynamic::List(vec![s("assets")])),
        ])
    }

    #[tokio::test]
    async fn create_sends_local_microsoft_watchlist() {
        let mut server = Server::new_async().await;
        let path = format!("{}?api-version=2024-09-01", watchlist_id());
        let _missing = server
            .mock("GET", path.as_str())
            .with_status(404)
            .create_async()
            .await;
        let put = server
            .mock("PUT", path.as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "properties": {
                    "displayName": "High value assets",
                    "provider": "Microsoft",
                    "source": "Local",
                    "itemsSearchKey": "Hostname",
                    "labels": ["assets"]
                }
            })))
            .with_body(
                r#"{"properties":{"displayName":"High value assets","provider":"Microsoft","itemsSearchKey":"Hostname"}}"#,
            )
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    planned_state: config(),
                    config: config(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response.new_state.get_string(&AttributePath::new("id")).unwrap(),
            watchlist_id()
        );
        put.assert_async().await;
    }

    #[tokio::test]
    async fn read_maps_properties_into_state() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", format!("{}?api-version=2024-09-01", watchlist_id()).as_str())
            .with_body(
                serde_json::json!({
                    "properties": {
                        "displayName": "Renamed",
                        "provider": "Microsoft",
                        "itemsSearchKey": "Hostname",
                        "defaultDuration": "P30D"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    current_state: object(vec![("id", s(&watchlist_id()))]),
                },
            )
            .await;

        let state = response.new_state.unwrap();
        assert_eq!(state.get_string(&AttributePath::new("display_name")).unwrap(), "Renamed");
        assert_eq!(
            state.get_string(&AttributePath::new("log_analytics_workspace_id")).unwrap(),
            WORKSPACE
        );
        assert_eq!(
            state.get_string(&AttributePath::new("default_duration")).unwrap(),
            "P30D"
        );
    }

    #[tokio::test]
    async fn upgrade_canonicalises_stored_id() {
        let resource = SentinelWatchlistResource::new();
        let legacy = watchlist_id()
            .replace("/workspaces/", "/Workspaces/")
            .replace("/watchlists/", "/Watchlists/");
        let raw = serde_json::json!({ "id": legacy, "name": "list1" });
        let response = resource
            .upgrade_state(
                Context::new(),
                UpgradeResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    version: 0,
                    raw_state: RawState::from_json(serde_json::to_vec(&raw).unwrap()),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response
                .upgraded_state
                .get_string(&AttributePath::new("id"))
                .unwrap(),
            watchlist_id()
        );
    }

    #[tokio::test]
    async fn import_rejects_workspace_id() {
        let resource = SentinelWatchlistResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    id: WORKSPACE.to_string(),
                },
            )
            .await;
        assert!(response.imported_resources.is_empty());
        assert_eq!(response.diagnostics.len(), 1);
    }
}
