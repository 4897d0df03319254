//! Sentinel alert rule template data source
//!
//! Templates are looked up by name or display name. The ID in the response
//! is re-parsed insensitively since the service does not keep the casing of
//! its fixed segments stable.

use crate::api::security_insights::AlertRuleTemplate;
use crate::ids::sentinel::validate_workspace_id;
use crate::ids::{AlertRuleTemplateId, WorkspaceId};
use crate::provider_data::AzureProviderData;
use crate::resourceids::ResourceId;
use crate::resources::{
    api_error, not_configured, optional_dynamic, optional_string, provider_data_from, set_attr,
    string_list_dynamic,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::timeouts::{Operation, ResourceTimeouts};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::ValidateFuncValidator;

const TYPE_NAME: &str = "azurerm_sentinel_alert_rule_template";
const KIND_SCHEDULED: &str = "Scheduled";
const KIND_SECURITY_INCIDENT: &str = "MicrosoftSecurityIncidentCreation";

pub struct SentinelAlertRuleTemplateDataSource {
    provider_data: Option<AzureProviderData>,
    timeouts: ResourceTimeouts,
}

impl Default for SentinelAlertRuleTemplateDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SentinelAlertRuleTemplateDataSource {
    pub fn new() -> Self {
        Self {
            provider_data: None,
            timeouts: ResourceTimeouts::read_only(std::time::Duration::from_secs(5 * 60)),
        }
    }
}

fn template_block(fields: &[(&str, AttributeType)]) -> AttributeType {
    AttributeType::List(Box::new(AttributeType::Object(
        fields
            .iter()
            .map(|(name, ty)| (name.to_string(), ty.clone()))
            .collect(),
    )))
}

pub(crate) fn schema_definition() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Looks up a Sentinel alert rule template")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("log_analytics_workspace_id", AttributeType::String)
                .required()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_workspace_id,
                    "must be a Log Analytics workspace ID",
                )))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .optional()
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("display_name", AttributeType::String)
                .optional()
                .computed()
                .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "scheduled_template",
                template_block(&[
                    ("description", AttributeType::String),
                    (
                        "tactics",
                        AttributeType::List(Box::new(AttributeType::String)),
                    ),
                    ("severity", AttributeType::String),
                    ("query", AttributeType::String),
                    ("query_frequency", AttributeType::String),
                    ("query_period", AttributeType::String),
                    ("trigger_operator", AttributeType::String),
                    ("trigger_threshold", AttributeType::Number),
                ]),
            )
            .computed()
            .build(),
        )
        .attribute(
            AttributeBuilder::new(
                "security_incident_template",
                template_block(&[
                    ("description", AttributeType::String),
                    ("product_filter", AttributeType::String),
                ]),
            )
            .computed()
            .build(),
        )
        .build()
}

fn validate_lookup(config: &DynamicValue) -> Vec<Diagnostic> {
    let set = |name: &str| {
        config
            .get(&AttributePath::new(name))
            .map(|v| !v.is_null())
            .unwrap_or(false)
    };
    if set("name") || set("display_name") {
        return vec![];
    }
    vec![Diagnostic::error(
        "Missing lookup argument",
        "at least one of `name` or `display_name` must be specified",
    )]
}

fn template_blocks(template: &AlertRuleTemplate) -> (Vec<Dynamic>, Vec<Dynamic>) {
    let props = &template.properties;
    let object = |fields: Vec<(&str, Dynamic)>| {
        Dynamic::Map(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<HashMap<_, _>>(),
        )
    };

    match template.kind.as_str() {
        KIND_SCHEDULED => (
            vec![object(vec![
                ("description", optional_dynamic(props.description.clone())),
                ("tactics", string_list_dynamic(&props.tactics)),
                ("severity", optional_dynamic(props.severity.clone())),
                ("query", optional_dynamic(props.query.clone())),
                ("query_frequency", optional_dynamic(props.query_frequency.clone())),
                ("query_period", optional_dynamic(props.query_period.clone())),
                ("trigger_operator", optional_dynamic(props.trigger_operator.clone())),
                (
                    "trigger_threshold",
                    props
                        .trigger_threshold
                        .map(|n| Dynamic::Number(n as f64))
                        .unwrap_or(Dynamic::Null),
                ),
            ])],
            vec![],
        ),
        KIND_SECURITY_INCIDENT => (
            vec![],
            vec![object(vec![
                ("description", optional_dynamic(props.description.clone())),
                ("product_filter", optional_dynamic(props.product_filter.clone())),
            ])],
        ),
        _ => (vec![], vec![]),
    }
}

impl SentinelAlertRuleTemplateDataSource {
    async fn lookup(
        &self,
        ctx: &Context,
        provider_data: &AzureProviderData,
        workspace: &WorkspaceId,
        name: Option<String>,
        display_name: Option<String>,
    ) -> Result<AlertRuleTemplate, Diagnostic> {
        let api = provider_data.client.security_insights();
        let templates = api.alert_rule_templates();

        if let Some(name) = name {
            let id = AlertRuleTemplateId::new(
                &workspace.subscription_id,
                &workspace.resource_group_name,
                &workspace.workspace_name,
                name,
            );
            return templates
                .get(ctx, &id)
                .await
                .map_err(|e| api_error(format!("retrieving {}", id), &e));
        }

        let display_name = display_name.unwrap_or_default();
        let all = templates
            .list(ctx, workspace)
            .await
            .map_err(|e| api_error(format!("listing alert rule templates in {}", workspace), &e))?;

        let mut matching: Vec<AlertRuleTemplate> = all
            .into_iter()
            .filter(|t| t.properties.display_name.as_deref() == Some(display_name.as_str()))
            .collect();

        match matching.len() {
            0 => Err(Diagnostic::error(
                "Alert rule template not found",
                format!(
                    "no alert rule template with display name {:?} was found in {}",
                    display_name, workspace
                ),
            )),
            1 => Ok(matching.remove(0)),
            n => Err(Diagnostic::error(
                "Ambiguous alert rule template",
                format!(
                    "{} alert rule templates share the display name {:?}, specify `name` instead",
                    n, display_name
                ),
            )),
        }
    }
}

#[async_trait]
impl DataSource for SentinelAlertRuleTemplateDataSource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: schema_definition(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        let mut diagnostics = schema_definition().validate_config(&request.config);
        diagnostics.extend(validate_lookup(&request.config));
        ValidateDataSourceConfigResponse { diagnostics }
    }

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let ctx = self.timeouts.context_for(ctx, Operation::Read);

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => return ReadDataSourceResponse::failed(request.config, not_configured()),
        };

        let workspace = match request
            .config
            .get_string(&AttributePath::new("log_analytics_workspace_id"))
            .map_err(|e| e.to_string())
            .and_then(|raw| WorkspaceId::parse(&raw).map_err(|e| e.to_string()))
        {
            Ok(workspace) => workspace,
            Err(e) => {
                return ReadDataSourceResponse::failed(
                    request.config,
                    Diagnostic::error("Invalid log_analytics_workspace_id", e)
                        .with_attribute(AttributePath::new("log_analytics_workspace_id")),
                )
            }
        };

        let name = optional_string(&request.config, "name");
        let display_name = optional_string(&request.config, "display_name");

        let template = match self
            .lookup(&ctx, provider_data, &workspace, name, display_name)
            .await
        {
            Ok(template) => template,
            Err(diag) => return ReadDataSourceResponse::failed(request.config, diag),
        };

        let id = match template
            .id
            .as_deref()
            .map(AlertRuleTemplateId::parse_insensitively)
        {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                return ReadDataSourceResponse::failed(
                    request.config,
                    Diagnostic::error(
                        "Invalid alert rule template ID",
                        format!("parsing ID returned by the API: {}", e),
                    ),
                )
            }
            None => {
                return ReadDataSourceResponse::failed(
                    request.config,
                    Diagnostic::error(
                        "Invalid alert rule template ID",
                        "the API returned an alert rule template without an ID",
                    ),
                )
            }
        };

        tracing::debug!(id = %id.id(), kind = %template.kind, "Read Sentinel alert rule template");

        let (scheduled, security_incident) = template_blocks(&template);
        let mut state = request.config.clone();
        set_attr(&mut state, "id", Dynamic::String(id.id()));
        set_attr(&mut state, "name", Dynamic::String(id.alert_rule_template_id.clone()));
        set_attr(
            &mut state,
            "display_name",
            optional_dynamic(template.properties.display_name.clone()),
        );
        set_attr(&mut state, "scheduled_template", Dynamic::List(scheduled));
        set_attr(
            &mut state,
            "security_incident_template",
            Dynamic::List(security_incident),
        );

        ReadDataSourceResponse {
            state,
            diagnostics: vec![],
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for SentinelAlertRuleTemplateDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let (provider_data, diagnostics) = provider_data_from(request.provider_data);
        if provider_data.is_some() {
            self.provider_data = provider_data;
        }
        ConfigureDataSourceResponse { diagnostics }
    }
}
