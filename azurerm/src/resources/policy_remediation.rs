//! Resource group policy remediation resource
//!
//! A remediation still evaluating its target resources can't be deleted, so
//! delete cancels it first.

use super::{
    api_error, not_configured, optional_dynamic, optional_string, provider_data_from,
    required_string, requires_import, set_attr, string_list, string_list_dynamic,
};
use crate::api::policy_insights::{FailureThreshold, RemediationFilters, RemediationProperties};
use crate::ids::common::validate_resource_group_id;
use crate::ids::policy::validate_policy_assignment_id;
use crate::ids::{ResourceGroupId, ResourceGroupPolicyRemediationId};
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
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::timeouts::{Operation, ResourceTimeouts};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{StringInSlice, StringIsNotEmpty, ValidateFuncValidator};

const TYPE_NAME: &str = "azurerm_resource_group_policy_remediation";
const STATE_EVALUATING: &str = "Evaluating";

pub struct ResourceGroupPolicyRemediationResource {
    provider_data: Option<AzureProviderData>,
    timeouts: ResourceTimeouts,
}

impl Default for ResourceGroupPolicyRemediationResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceGroupPolicyRemediationResource {
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
        .description("Manages a policy remediation scoped to a resource group")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .required()
                .requires_replace()
                .validator(Box::new(StringIsNotEmpty))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("resource_group_id", AttributeType::String)
                .required()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_resource_group_id,
                    "must be a resource group ID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("policy_assignment_id", AttributeType::String)
                .required()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_policy_assignment_id,
                    "must be a policy assignment ID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("policy_definition_reference_id", AttributeType::String)
                .description("Definition to remediate when the assignment is an initiative")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "location_filters",
                AttributeType::List(Box::new(AttributeType::String)),
            )
            .optional()
            .build(),
        )
        .attribute(
            AttributeBuilder::new("resource_discovery_mode", AttributeType::String)
                .optional()
                .computed()
                .validator(Box::new(StringInSlice::new(&[
                    "ExistingNonCompliant",
                    "ReEvaluateCompliance",
                ])))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("failure_percentage", AttributeType::Number)
                .description("Fraction of failed deployments, 0 to 1, at which the remediation stops")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("parallel_deployments", AttributeType::Number)
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("resource_count", AttributeType::Number)
                .description("Maximum number of resources to remediate")
                .optional()
                .build(),
        )
        .build()
}

fn optional_i64(config: &DynamicValue, name: &str) -> Option<i64> {
    config
        .get_number(&AttributePath::new(name))
        .ok()
        .map(|n| n as i64)
}

fn extract_config(
    config: &DynamicValue,
) -> Result<(ResourceGroupPolicyRemediationId, RemediationProperties), Diagnostic> {
    let resource_group = ResourceGroupId::parse(&required_string(config, "resource_group_id")?)
        .map_err(|e| {
            Diagnostic::error("Invalid resource_group_id", e.to_string())
                .with_attribute(AttributePath::new("resource_group_id"))
        })?;

    let id = ResourceGroupPolicyRemediationId::new(
        resource_group.subscription_id,
        resource_group.resource_group_name,
        required_string(config, "name")?,
    );

    let locations = string_list(config, "location_filters");
    let properties = RemediationProperties {
        policy_assignment_id: required_string(config, "policy_assignment_id")?,
        policy_definition_reference_id: optional_string(config, "policy_definition_reference_id"),
        resource_discovery_mode: optional_string(config, "resource_discovery_mode"),
        filters: (!locations.is_empty()).then_some(RemediationFilters { locations }),
        resource_count: optional_i64(config, "resource_count"),
        parallel_deployments: optional_i64(config, "parallel_deployments"),
        failure_threshold: config
            .get_number(&AttributePath::new("failure_percentage"))
            .ok()
            .map(|percentage| FailureThreshold { percentage }),
        provisioning_state: None,
    };

    Ok((id, properties))
}

fn stored_id(state: &DynamicValue) -> Result<ResourceGroupPolicyRemediationId, Diagnostic> {
    let raw = state
        .get_string(&AttributePath::new("id"))
        .unwrap_or_default();
    ResourceGroupPolicyRemediationId::parse(&raw)
        .map_err(|e| Diagnostic::error("Invalid resource ID", e.to_string()))
}

fn number_or_null(value: Option<i64>) -> Dynamic {
    value.map(|n| Dynamic::Number(n as f64)).unwrap_or(Dynamic::Null)
}

#[async_trait]
impl Resource for ResourceGroupPolicyRemediationResource {
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

        let api = provider_data.client.policy_insights();
        match api.get_remediation(&ctx, &id.id()).await {
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

        tracing::debug!(id = %id.id(), "Creating policy remediation");

        let mut new_state = request.planned_state;
        match api.create_or_update_remediation(&ctx, &id.id(), properties).await {
            Ok(remediation) => {
                set_attr(&mut new_state, "id", Dynamic::String(id.id()));
                if let Some(mode) = remediation.properties.resource_discovery_mode {
                    set_attr(&mut new_state, "resource_discovery_mode", Dynamic::String(mode));
                }
            }
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

        let remediation = match provider_data
            .client
            .policy_insights()
            .get_remediation(&ctx, &id.id())
            .await
        {
            Ok(remediation) => remediation,
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %id.id(), "Policy remediation was not found, removing from state");
                return ReadResourceResponse::removed();
            }
            Err(e) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![api_error(format!("retrieving {}", id), &e)],
                }
            }
        };

        let props = remediation.properties;
        let mut state = request.current_state.clone();
        set_attr(&mut state, "id", Dynamic::String(id.id()));
        set_attr(&mut state, "name", Dynamic::String(id.remediation_name.clone()));
        set_attr(
            &mut state,
            "resource_group_id",
            Dynamic::String(id.resource_group_id().id()),
        );
        set_attr(
            &mut state,
            "policy_assignment_id",
            Dynamic::String(props.policy_assignment_id),
        );
        set_attr(
            &mut state,
            "policy_definition_reference_id",
            optional_dynamic(props.policy_definition_reference_id),
        );
        let locations = props.filters.map(|f| f.locations).unwrap_or_default();
        if !locations.is_empty() {
            set_attr(&mut state, "location_filters", string_list_dynamic(&locations));
        }
        set_attr(
            &mut state,
            "resource_discovery_mode",
            optional_dynamic(props.resource_discovery_mode),
        );
        set_attr(
            &mut state,
            "failure_percentage",
            props
                .failure_threshold
                .map(|t| Dynamic::Number(t.percentage))
                .unwrap_or(Dynamic::Null),
        );
        set_attr(
            &mut state,
            "parallel_deployments",
            number_or_null(props.parallel_deployments),
        );
        set_attr(&mut state, "resource_count", number_or_null(props.resource_count));

        ReadResourceResponse {
            new_state: Some(state),
            diagnostics: vec![],
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Update);
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return UpdateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let (id, properties) = match extract_config(&request.config) {
            Ok(parts) => parts,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        if let Err(e) = provider_data
            .client
            .policy_insights()
            .create_or_update_remediation(&ctx, &id.id(), properties)
            .await
        {
            diagnostics.push(api_error(format!("updating {}", id), &e));
        }

        UpdateResourceResponse {
            new_state: request.planned_state,
            diagnostics,
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Delete);
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return DeleteResourceResponse { diagnostics };
            }
        };

        let id = match stored_id(&request.prior_state) {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let api = provider_data.client.policy_insights();
        let remediation = match api.get_remediation(&ctx, &id.id()).await {
            Ok(remediation) => remediation,
            Err(e) if e.is_not_found() => return DeleteResourceResponse { diagnostics },
            Err(e) => {
                diagnostics.push(api_error(format!("retrieving {}", id), &e));
                return DeleteResourceResponse { diagnostics };
            }
        };

        if remediation.properties.provisioning_state.as_deref() == Some(STATE_EVALUATING) {
            tracing::info!(id = %id.id(), "Cancelling policy remediation before deletion");
            if let Err(e) = api.cancel_remediation(&ctx, &id.id()).await {
                diagnostics.push(api_error(format!("cancelling {}", id), &e));
                return DeleteResourceResponse { diagnostics };
            }
        }

        if let Err(e) = api.delete_remediation(&ctx, &id.id()).await {
            diagnostics.push(api_error(format!("deleting {}", id), &e));
        }
        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ResourceGroupPolicyRemediationResource {
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
impl ResourceWithImportState for ResourceGroupPolicyRemediationResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        import_state_validating_id(
            &ctx,
            |id| ResourceGroupPolicyRemediationId::parse(id).map(|_| ()),
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

    const GROUP: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1";
    const ASSIGNMENT: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.Authorization/policyAssignments/assign1";

    fn remediation_id() -> String {
        format!("{}/providers/Microsoft.PolicyInsights/remediations/fix1", GROUP)
    }

    async fn configured(url: &str) -> ResourceGroupPolicyRemediationResource {
        let mut resource = ResourceGroupPolicyRemediationResource::new();
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
            ("name", s("fix1")),
            ("resource_group_id", s(GROUP)),
            ("policy_assignment_id", s(ASSIGNMENT)),
            ("location_filters", Dynamic::List(vec![s("westeurope")])),
            ("failure_percentage", Dynamic::Number(0.5)),
            ("parallel_deployments", Dynamic::Number(5.0)),
        ])
    }

    #[test]
    fn extract_config_builds_request_body() {
        let (id, props) = extract_config(&config()).unwrap();
        assert_eq!(id.id(), remediation_id());
        let body = serde_json::to_value(&props).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "policyAssignmentId": ASSIGNMENT,
                "filters": {"locations": ["westeurope"]},
                "parallelDeployments": 5,
                "failureThreshold": {"percentage": 0.5}
            })
        );
    }

    #[tokio::test]
    async fn create_puts_remediation() {
        let mut server = Server::new_async().await;
        let path = format!("{}?api-version=2021-10-01", remediation_id());
        let _missing = server
            .mock("GET", path.as_str())
            .with_status(404)
            .create_async()
            .await;
        let put = server
            .mock("PUT", path.as_str())
            .match_body(Matcher::PartialJson(serde_json::json!({
                "properties": {"policyAssignmentId": ASSIGNMENT}
            })))
            .with_status(201)
            .with_body(
                serde_json::json!({
                    "properties": {
                        "policyAssignmentId": ASSIGNMENT,
                        "resourceDiscoveryMode": "ExistingNonCompliant",
                        "provisioningState": "Accepted"
                    }
                })
                .to_string(),
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
        put.assert_async().await;
        assert_eq!(
            response
                .new_state
                .get_string(&AttributePath::new("resource_discovery_mode"))
                .unwrap(),
            "ExistingNonCompliant"
        );
    }

    #[tokio::test]
    async fn delete_cancels_evaluating_remediation() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", format!("{}?api-version=2021-10-01", remediation_id()).as_str())
            .with_body(
                serde_json::json!({
                    "properties": {"policyAssignmentId": ASSIGNMENT, "provisioningState": "Evaluating"}
                })
                .to_string(),
            )
            .create_async()
            .await;
        let cancel = server
            .mock(
                "POST",
                format!("{}/cancel?api-version=2021-10-01", remediation_id()).as_str(),
            )
            .with_body(
                serde_json::json!({
                    "properties": {"policyAssignmentId": ASSIGNMENT, "provisioningState": "Cancelling"}
                })
                .to_string(),
            )
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", format!("{}?api-version=2021-10-01", remediation_id()).as_str())
            .with_status(200)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: object(vec![("id", s(&remediation_id()))]),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        cancel.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn delete_skips_cancel_when_finished() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", format!("{}?api-version=2021-10-01", remediation_id()).as_str())
            .with_body(
                serde_json::json!({
                    "properties": {"policyAssignmentId": ASSIGNMENT, "provisioningState": "Succeeded"}
                })
                .to_string(),
            )
            .create_async()
            .await;
        let cancel = server
            .mock(
                "POST",
                format!("{}/cancel?api-version=2021-10-01", remediation_id()).as_str(),
            )
            .expect(0)
            .create_async()
            .await;
        let _delete = server
            .mock("DELETE", format!("{}?api-version=2021-10-01", remediation_id()).as_str())
            .with_status(204)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    prior_state: object(vec![("id", s(&remediation_id()))]),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        cancel.assert_async().await;
    }

    #[test]
    fn schema_rejects_unknown_discovery_mode() {
        let mut cfg = config();
        cfg.set_string(
            &AttributePath::new("resource_discovery_mode"),
            "Everything".to_string(),
        )
        .unwrap();
        let diags = schema_definition().validate_config(&cfg);
        assert_eq!(diags.iter().filter(|d| d.is_error()).count(), 1);
    }
}
