//! Sentinel automation rule resource

use super::{
    api_error, not_configured, object_list, object_number, object_string, object_string_list,
    optional_dynamic, optional_string, provider_data_from, required_string, requires_import,
    set_attr, string_list_dynamic, validate_uuid,
};
use crate::api::security_insights::{
    AutomationRuleAction, AutomationRuleCondition, AutomationRuleProperties, IncidentLabel,
    IncidentOwner, ModifyPropertiesConfiguration, PropertyConditionValues,
    RunPlaybookConfiguration, TriggeringLogic,
};
use crate::ids::sentinel::validate_workspace_id;
use crate::ids::{AutomationRuleId, WorkspaceId};
use crate::migration::SentinelAutomationRuleV0ToV1;
use crate::provider_data::AzureProviderData;
use crate::resourceids::ResourceId;
use async_trait::async_trait;
use std::collections::HashMap;
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
use tfplug::validator::{StringInSlice, StringIsNotEmpty, ValidateFuncValidator};

const TYPE_NAME: &str = "azurerm_sentinel_automation_rule";
const SCHEMA_VERSION: i64 = 1;

const DEFAULT_TRIGGERS_ON: &str = "Incidents";
const DEFAULT_TRIGGERS_WHEN: &str = "Created";
const STATUS_CLOSED: &str = "Closed";

pub struct SentinelAutomationRuleResource {
    provider_data: Option<AzureProviderData>,
    timeouts: ResourceTimeouts,
}

impl Default for SentinelAutomationRuleResource {
    fn default() -> Self {
        Self::new()
    }
}

impl SentinelAutomationRuleResource {
    pub fn new() -> Self {
        Self {
            provider_data: None,
            timeouts: ResourceTimeouts::default(),
        }
    }
}

fn object_type(fields: &[(&str, AttributeType)]) -> AttributeType {
    AttributeType::List(Box::new(AttributeType::Object(
        fields
            .iter()
            .map(|(name, ty)| (name.to_string(), ty.clone()))
            .collect(),
    )))
}

fn string_list_type() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

pub(crate) fn schema_definition() -> Schema {
    SchemaBuilder::new()
        .version(SCHEMA_VERSION)
        .description("Manages a Sentinel automation rule")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("Automation rule ID")
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("GUID naming the automation rule")
                .required()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_uuid,
                    "must be a UUID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("log_analytics_workspace_id", AttributeType::String)
                .required()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_workspace_id,
                    "must be a Log Analytics workspace ID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("display_name", AttributeType::String)
                .required()
                .validator(Box::new(StringIsNotEmpty))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("order", AttributeType::Number)
                .description("Order in which rules run, 1 to 1000")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("enabled", AttributeType::Bool)
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("expiration", AttributeType::String)
                .description("RFC 3339 time after which the rule stops running")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("triggers_on", AttributeType::String)
                .optional()
                .computed()
                .validator(Box::new(StringInSlice::new(&["Incidents", "Alerts"])))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("triggers_when", AttributeType::String)
                .optional()
                .computed()
                .validator(Box::new(StringInSlice::new(&["Created", "Updated"])))
                .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "condition_property",
                object_type(&[
                    ("property", AttributeType::String),
                    ("operator", AttributeType::String),
                    ("values", string_list_type()),
                ]),
            )
            .optional()
            .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "action_incident",
                object_type(&[
                    ("order", AttributeType::Number),
                    ("status", AttributeType::String),
                    ("classification", AttributeType::String),
                    ("classification_comment", AttributeType::String),
                    ("severity", AttributeType::String),
                    ("owner_id", AttributeType::String),
                    ("labels", string_list_type()),
                ]),
            )
            .optional()
            .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "action_playbook",
                object_type(&[
                    ("order", AttributeType::Number),
                    ("logic_app_id", AttributeType::String),
                    ("tenant_id", AttributeType::String),
                ]),
            )
            .optional()
            .build(),
        )
        .build()
}

/// Checks spanning several arguments, run after the schema validators
fn validate_actions(config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = vec![];
    let incidents = object_list(config, "action_incident");
    let playbooks = object_list(config, "action_playbook");

    let unknown = |name: &str| {
        config
            .get(&AttributePath::new(name))
            .map(|v| v.is_unknown())
            .unwrap_or(false)
    };
    if incidents.is_empty()
        && playbooks.is_empty()
        && !unknown("action_incident")
        && !unknown("action_playbook")
    {
        diagnostics.push(Diagnostic::error(
            "Missing action",
            "at least one of `action_incident` or `action_playbook` must be specified",
        ));
    }

    for (idx, action) in incidents.iter().enumerate() {
        let closed = object_string(action, "status").as_deref() == Some(STATUS_CLOSED);
        if closed && object_string(action, "classification").is_none() {
            diagnostics.push(
                Diagnostic::error(
                    "Missing classification",
                    "`classification` is required when `status` is \"Closed\"",
                )
                .with_attribute(AttributePath::new("action_incident").index(idx as i64)),
            );
        }
    }

    diagnostics
}

fn build_conditions(config: &DynamicValue) -> Vec<AutomationRuleCondition> {
    object_list(config, "condition_property")
        .iter()
        .map(|condition| AutomationRuleCondition::Property {
            properties: PropertyConditionValues {
                property_name: object_string(condition, "property").unwrap_or_default(),
                operator: object_string(condition, "operator").unwrap_or_default(),
                property_values: object_string_list(condition, "values"),
            },
        })
        .collect()
}

fn build_actions(config: &DynamicValue) -> Vec<AutomationRuleAction> {
    let mut actions: Vec<AutomationRuleAction> = object_list(config, "action_incident")
        .iter()
        .map(|action| AutomationRuleAction::ModifyProperties {
            order: object_number(action, "order").unwrap_or_default() as i64,
            configuration: ModifyPropertiesConfiguration {
                status: object_string(action, "status"),
                classification: object_string(action, "classification"),
                classification_comment: object_string(action, "classification_comment"),
                severity: object_string(action, "severity"),
                owner: object_string(action, "owner_id").map(|object_id| IncidentOwner { object_id }),
                labels: object_string_list(action, "labels")
                    .into_iter()
                    .map(|label_name| IncidentLabel { label_name })
                    .collect(),
            },
        })
        .collect();

    actions.extend(object_list(config, "action_playbook").iter().map(|action| {
        AutomationRuleAction::RunPlaybook {
            order: object_number(action, "order").unwrap_or_default() as i64,
            configuration: RunPlaybookConfiguration {
                logic_app_resource_id: object_string(action, "logic_app_id").unwrap_or_default(),
                tenant_id: object_string(action, "tenant_id").unwrap_or_default(),
            },
        }
    }));

    actions.sort_by_key(AutomationRuleAction::order);
    actions
}

fn extract_config(
    config: &DynamicValue,
) -> Result<(AutomationRuleId, AutomationRuleProperties), Diagnostic> {
    let workspace = WorkspaceId::parse(&required_string(config, "log_analytics_workspace_id")?)
        .map_err(|e| {
            Diagnostic::error("Invalid log_analytics_workspace_id", e.to_string())
                .with_attribute(AttributePath::new("log_analytics_workspace_id"))
        })?;

    let id = AutomationRuleId::new(
        workspace.subscription_id,
        workspace.resource_group_name,
        workspace.workspace_name,
        required_string(config, "name")?,
    );

    let order = config.get_number(&AttributePath::new("order")).map_err(|_| {
        Diagnostic::error("Missing order", "The 'order' attribute is required")
            .with_attribute(AttributePath::new("order"))
    })?;

    let properties = AutomationRuleProperties {
        display_name: required_string(config, "display_name")?,
        order: order as i64,
        triggering_logic: TriggeringLogic {
            is_enabled: config
                .get_bool(&AttributePath::new("enabled"))
                .unwrap_or(true),
            expiration_time_utc: optional_string(config, "expiration"),
            triggers_on: optional_string(config, "triggers_on")
                .unwrap_or_else(|| DEFAULT_TRIGGERS_ON.to_string()),
            triggers_when: optional_string(config, "triggers_when")
                .unwrap_or_else(|| DEFAULT_TRIGGERS_WHEN.to_string()),
            conditions: build_conditions(config),
        },
        actions: build_actions(config),
    };

    Ok((id, properties))
}

fn object(fields: Vec<(&str, Dynamic)>) -> Dynamic {
    Dynamic::Map(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    )
}

/// Writes the API representation back into the flat list attributes
fn flatten_into(state: &mut DynamicValue, props: &AutomationRuleProperties) {
    let logic = &props.triggering_logic;
    set_attr(state, "display_name", Dynamic::String(props.display_name.clone()));
    set_attr(state, "order", Dynamic::Number(props.order as f64));
    set_attr(state, "enabled", Dynamic::Bool(logic.is_enabled));
    set_attr(state, "expiration", optional_dynamic(logic.expiration_time_utc.clone()));
    set_attr(state, "triggers_on", Dynamic::String(logic.triggers_on.clone()));
    set_attr(state, "triggers_when", Dynamic::String(logic.triggers_when.clone()));

    let conditions = logic
        .conditions
        .iter()
        .map(|AutomationRuleCondition::Property { properties }| {
            object(vec![
                ("property", Dynamic::String(properties.property_name.clone())),
                ("operator", Dynamic::String(properties.operator.clone())),
                ("values", string_list_dynamic(&properties.property_values)),
            ])
        })
        .collect();
    set_attr(state, "condition_property", Dynamic::List(conditions));

    let mut incidents = vec![];
    let mut playbooks = vec![];
    for action in &props.actions {
        match action {
            AutomationRuleAction::ModifyProperties {
                order,
                configuration,
            } => {
                let labels: Vec<String> = configuration
                    .labels
                    .iter()
                    .map(|l| l.label_name.clone())
                    .collect();
                incidents.push(object(vec![
                    ("order", Dynamic::Number(*order as f64)),
                    ("status", optional_dynamic(configuration.status.clone())),
                    (
                        "classification",
                        optional_dynamic(configuration.classification.clone()),
                    ),
                    (
                        "classification_comment",
                        optional_dynamic(configuration.classification_comment.clone()),
                    ),
                    ("severity", optional_dynamic(configuration.severity.clone())),
                    (
                        "owner_id",
                        optional_dynamic(configuration.owner.as_ref().map(|o| o.object_id.clone())),
                    ),
                    ("labels", string_list_dynamic(&labels)),
                ]));
            }
            AutomationRuleAction::RunPlaybook {
                order,
                configuration,
            } => playbooks.push(object(vec![
                ("order", Dynamic::Number(*order as f64)),
                (
                    "logic_app_id",
                    Dynamic::String(configuration.logic_app_resource_id.clone()),
                ),
                ("tenant_id", Dynamic::String(configuration.tenant_id.clone())),
            ])),
        }
    }
    set_attr(state, "action_incident", Dynamic::List(incidents));
    set_attr(state, "action_playbook", Dynamic::List(playbooks));
}

fn stored_id(state: &DynamicValue) -> Result<AutomationRuleId, Diagnostic> {
    let raw = state
        .get_string(&AttributePath::new("id"))
        .unwrap_or_default();
    AutomationRuleId::parse(&raw)
        .map_err(|e| Diagnostic::error("Invalid resource ID", e.to_string()))
}

#[async_trait]
impl Resource for SentinelAutomationRuleResource {
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
        let mut diagnostics = schema_definition().validate_config(&request.config);
        diagnostics.extend(validate_actions(&request.config));
        ValidateResourceConfigResponse { diagnostics }
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
        let rules = api.automation_rules();

        match rules.get(&ctx, &id).await {
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

        tracing::debug!(id = %id.id(), actions = properties.actions.len(), "Creating Sentinel automation rule");

        let mut new_state = request.planned_state;
        match rules.create_or_update(&ctx, &id, properties, None).await {
            Ok(rule) => {
                set_attr(&mut new_state, "id", Dynamic::String(id.id()));
                flatten_into(&mut new_state, &rule.properties);
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

        let rule = match provider_data
            .client
            .security_insights()
            .automation_rules()
            .get(&ctx, &id)
            .await
        {
            Ok(rule) => rule,
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %id.id(), "Sentinel automation rule was not found, removing from state");
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
        set_attr(&mut state, "name", Dynamic::String(id.automation_rule_id.clone()));
        set_attr(
            &mut state,
            "log_analytics_workspace_id",
            Dynamic::String(id.workspace_id().id()),
        );
        flatten_into(&mut state, &rule.properties);

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

        let api = provider_data.client.security_insights();
        let rules = api.automation_rules();

        let etag = match rules.get(&ctx, &id).await {
            Ok(existing) => existing.etag,
            Err(e) => {
                diagnostics.push(api_error(format!("retrieving {}", id), &e));
                return UpdateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        let mut new_state = request.planned_state;
        match rules.create_or_update(&ctx, &id, properties, etag).await {
            Ok(rule) => flatten_into(&mut new_state, &rule.properties),
            Err(e) => diagnostics.push(api_error(format!("updating {}", id), &e)),
        }

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

        let mut diagnostics = vec![];
        if let Err(e) = provider_data
            .client
            .security_insights()
            .automation_rules()
            .delete(&ctx, &id)
            .await
        {
            diagnostics.push(api_error(format!("deleting {}", id), &e));
        }
        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for SentinelAutomationRuleResource {
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
impl ResourceWithUpgradeState for SentinelAutomationRuleResource {
    async fn upgrade_state(
        &self,
        ctx: Context,
        request: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse {
        let upgraders = StateUpgraders::new().register(0, SentinelAutomationRuleV0ToV1);
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
impl ResourceWithImportState for SentinelAutomationRuleResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        import_state_validating_id(
            &ctx,
            |id| AutomationRuleId::parse(id).map(|_| ()),
            &request,
            &mut response,
        );
        response
    }
}
