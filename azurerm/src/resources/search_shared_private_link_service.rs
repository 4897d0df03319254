//! Search shared private link resource
//!
//! Writes to the shared private links of one search service are serialised
//! through a lock on the service ID; the service rejects concurrent updates.

use super::{
    api_error, not_configured, optional_dynamic, optional_string, provider_data_from,
    required_string, requires_import, set_attr,
};
use crate::api::search::SharedPrivateLinkResourceProperties;
use crate::ids::search::validate_search_service_id;
use crate::ids::{SearchServiceId, SharedPrivateLinkResourceId};
use crate::locks;
use crate::provider_data::AzureProviderData;
use crate::resourceids::generic::validate_resource_id;
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
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::timeouts::{Operation, ResourceTimeouts};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{StringIsNotEmpty, ValidateFuncValidator};

const TYPE_NAME: &str = "azurerm_search_shared_private_link_service";

pub struct SearchSharedPrivateLinkServiceResource {
    provider_data: Option<AzureProviderData>,
    timeouts: ResourceTimeouts,
}

impl Default for SearchSharedPrivateLinkServiceResource {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSharedPrivateLinkServiceResource {
    pub fn new() -> Self {
        Self {
            provider_data: None,
            timeouts: ResourceTimeouts::default(),
        }
    }
}

pub(crate) fn schema_definition() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Manages a shared private link resource of an Azure Search service")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("Shared private link resource ID")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("Name of the shared private link resource")
                .required()
                .requires_replace()
                .validator(Box::new(StringIsNotEmpty))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("search_service_id", AttributeType::String)
                .description("ID of the search service")
                .required()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_search_service_id,
                    "must be a search service ID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("subresource_name", AttributeType::String)
                .description("Group ID of the target resource, e.g. `blob`")
                .required()
                .requires_replace()
                .validator(Box::new(StringIsNotEmpty))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("target_resource_id", AttributeType::String)
                .description("ID of the resource the private link points at")
                .required()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_resource_id,
                    "must be an Azure resource ID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("request_message", AttributeType::String)
                .description("Message sent with the approval request")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("status", AttributeType::String)
                .description("Approval status of the connection")
                .computed()
                .build(),
        )
        .build()
}

#[derive(Debug, Clone)]
struct SharedPrivateLinkConfig {
    id: SharedPrivateLinkResourceId,
    properties: SharedPrivateLinkResourceProperties,
}

fn extract_config(config: &DynamicValue) -> Result<SharedPrivateLinkConfig, Diagnostic> {
    let service_id = required_string(config, "search_service_id")?;
    let service = SearchServiceId::parse(&service_id).map_err(|e| {
        Diagnostic::error("Invalid search_service_id", e.to_string())
            .with_attribute(AttributePath::new("search_service_id"))
    })?;

    let id = SharedPrivateLinkResourceId::new(
        service.subscription_id,
        service.resource_group_name,
        service.search_service_name,
        required_string(config, "name")?,
    );

    Ok(SharedPrivateLinkConfig {
        id,
        properties: SharedPrivateLinkResourceProperties {
            private_link_resource_id: required_string(config, "target_resource_id")?,
            group_id: required_string(config, "subresource_name")?,
            request_message: optional_string(config, "request_message"),
            ..Default::default()
        },
    })
}

fn stored_id(state: &DynamicValue) -> Result<SharedPrivateLinkResourceId, Diagnostic> {
    let raw = state
        .get_string(&AttributePath::new("id"))
        .unwrap_or_default();
    SharedPrivateLinkResourceId::parse(&raw)
        .map_err(|e| Diagnostic::error("Invalid resource ID", e.to_string()))
}

impl SearchSharedPrivateLinkServiceResource {
    async fn put(
        &self,
        ctx: &Context,
        provider_data: &AzureProviderData,
        config: SharedPrivateLinkConfig,
        mut new_state: DynamicValue,
        check_existing: bool,
    ) -> (DynamicValue, Vec<Diagnostic>) {
        let api = provider_data.client.search();
        let links = api.shared_private_link_resources();
        let service_id = config.id.search_service_id().id();

        let _lock = locks::by_id(&service_id).await;

        if check_existing {
            match links.get(ctx, &config.id).await {
                Ok(_) => {
                    return (new_state, vec![requires_import(TYPE_NAME, &config.id.id())]);
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    return (
                        new_state,
                        vec![api_error(
                            format!("checking for presence of existing {}", config.id),
                            &e,
                        )],
                    );
                }
            }
        }

        tracing::debug!(id = %config.id.id(), "Writing shared private link resource");

        match links
            .create_or_update(ctx, &config.id, config.properties)
            .await
        {
            Ok(link) => {
                set_attr(&mut new_state, "id", Dynamic::String(config.id.id()));
                set_attr(
                    &mut new_state,
                    "status",
                    optional_dynamic(link.properties.status),
                );
                (new_state, vec![])
            }
            Err(e) => (
                new_state,
                vec![api_error(format!("creating/updating {}", config.id), &e)],
            ),
        }
    }
}

#[async_trait]
impl Resource for SearchSharedPrivateLinkServiceResource {
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
        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: vec![not_configured()],
                }
            }
        };

        let config = match extract_config(&request.config) {
            Ok(config) => config,
            Err(diag) => {
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: vec![diag],
                }
            }
        };

        let (new_state, diagnostics) = self
            .put(&ctx, provider_data, config, request.planned_state, true)
            .await;
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

        let link = match provider_data
            .client
            .search()
            .shared_private_link_resources()
            .get(&ctx, &id)
            .await
        {
            Ok(link) => link,
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %id.id(), "Shared private link resource was not found, removing from state");
                return ReadResourceResponse::removed();
            }
            Err(e) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![api_error(format!("retrieving {}", id), &e)],
                }
            }
        };

        let mut state = request.current_state.clone();
        set_attr(&mut state, "id", Dynamic::String(id.id()));
        set_attr(
            &mut state,
            "name",
            Dynamic::String(id.shared_private_link_resource_name.clone()),
        );
        set_attr(
            &mut state,
            "search_service_id",
            Dynamic::String(id.search_service_id().id()),
        );
        set_attr(
            &mut state,
            "subresource_name",
            Dynamic::String(link.properties.group_id),
        );
        set_attr(
            &mut state,
            "target_resource_id",
            Dynamic::String(link.properties.private_link_resource_id),
        );
        set_attr(
            &mut state,
            "request_message",
            optional_dynamic(link.properties.request_message),
        );
        set_attr(&mut state, "status", optional_dynamic(link.properties.status));

        ReadResourceResponse {
            new_state: Some(state),
            diagnostics: vec![],
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Update);
        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                return UpdateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: vec![not_configured()],
                }
            }
        };

        let config = match extract_config(&request.config) {
            Ok(config) => config,
            Err(diag) => {
                return UpdateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: vec![diag],
                }
            }
        };

        let (new_state, diagnostics) = self
            .put(&ctx, provider_data, config, request.planned_state, false)
            .await;
        UpdateResourceResponse {
            new_state,
            diagnostics,
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

        let _lock = locks::by_id(&id.search_service_id().id()).await;

        let mut diagnostics = vec![];
        if let Err(e) = provider_data
            .client
            .search()
            .shared_private_link_resources()
            .delete(&ctx, &id)
            .await
        {
            diagnostics.push(api_error(format!("deleting {}", id), &e));
        }
        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for SearchSharedPrivateLinkServiceResource {
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
impl ResourceWithImportState for SearchSharedPrivateLinkServiceResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        import_state_validating_id(
            &ctx,
            |id| SharedPrivateLinkResourceId::parse(id).map(|_| ()),
            &request,
            &mut response,
        );
        response
    }
}
