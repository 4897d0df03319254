//! Automation job schedule resource
//!
//! Links a runbook to a schedule. ARM addresses the link by a GUID, the
//! stored `id` addresses it by runbook and schedule name, so reads fall back
//! to listing the account's job schedules when the GUID is unknown.

use super::{
    api_error, not_configured, optional_string, provider_data_from, required_string,
    requires_import, set_attr, validate_uuid,
};
use crate::api::automation::{JobSchedule, JobScheduleProperties, NameReference};
use crate::ids::{AutomationAccountId, AutomationJobScheduleId, JobScheduleId};
use crate::migration::AutomationJobScheduleV0ToV1;
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
use tfplug::validator::{StringIsNotEmpty, ValidateFuncValidator};

const TYPE_NAME: &str = "azurerm_automation_job_schedule";
const SCHEMA_VERSION: i64 = 1;

pub struct AutomationJobScheduleResource {
    provider_data: Option<AzureProviderData>,
    timeouts: ResourceTimeouts,
}

impl Default for AutomationJobScheduleResource {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationJobScheduleResource {
    pub fn new() -> Self {
        Self {
            provider_data: None,
            timeouts: ResourceTimeouts::default(),
        }
    }

    fn upgraders() -> StateUpgraders<AzureProviderData> {
        StateUpgraders::new().register(0, AutomationJobScheduleV0ToV1)
    }
}

fn name_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .required()
        .requires_replace()
        .validator(Box::new(StringIsNotEmpty))
        .build()
}

pub(crate) fn schema_definition() -> Schema {
    SchemaBuilder::new()
        .version(SCHEMA_VERSION)
        .description("Links an Automation Runbook to a Schedule")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("Automation job schedule ID")
                .computed()
                .build(),
        )
        .attribute(name_attribute(
            "resource_group_name",
            "Resource group of the Automation Account",
        ))
        .attribute(name_attribute(
            "automation_account_name",
            "Automation Account the runbook and schedule belong to",
        ))
        .attribute(name_attribute("runbook_name", "Runbook to run"))
        .attribute(name_attribute("schedule_name", "Schedule to run the runbook on"))
        .attribute(
            AttributeBuilder::new("parameters", AttributeType::Map(Box::new(AttributeType::String)))
                .description("Runbook parameters. Keys are lower-cased by the service.")
                .optional()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("run_on", AttributeType::String)
                .description("Hybrid worker group to run the runbook on")
                .optional()
                .requires_replace()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("job_schedule_id", AttributeType::String)
                .description("GUID ARM uses for the job schedule")
                .optional()
                .computed()
                .requires_replace()
                .validator(Box::new(ValidateFuncValidator::new(
                    validate_uuid,
                    "must be a UUID",
                )))
                .build(),
        )
        .build()
}

#[derive(Debug, Clone, PartialEq)]
struct JobScheduleConfig {
    id: AutomationJobScheduleId,
    parameters: HashMap<String, String>,
    run_on: Option<String>,
    job_schedule_id: Option<String>,
}

impl JobScheduleConfig {
    fn account_id(&self) -> AutomationAccountId {
        self.id.automation_account_id()
    }
}

fn extract_config(
    subscription_id: &str,
    config: &DynamicValue,
) -> Result<JobScheduleConfig, Diagnostic> {
    let id = AutomationJobScheduleId::new(
        subscription_id,
        required_string(config, "resource_group_name")?,
        required_string(config, "automation_account_name")?,
        required_string(config, "runbook_name")?,
        required_string(config, "schedule_name")?,
    );

    let parameters = config
        .get_map(&AttributePath::new("parameters"))
        .map(|m| {
            m.into_iter()
                .filter_map(|(k, v)| v.as_string().map(|s| (k, s.clone())))
                .collect()
        })
        .unwrap_or_default();

    Ok(JobScheduleConfig {
        id,
        parameters,
        run_on: optional_string(config, "run_on"),
        job_schedule_id: optional_string(config, "job_schedule_id"),
    })
}

fn matches_link(schedule: &JobSchedule, id: &AutomationJobScheduleId) -> bool {
    schedule.properties.runbook.name == id.runbook_name
        && schedule.properties.schedule.name == id.schedule_name
}

/// The job schedule GUID: taken from the ARM ID when present, else the properties
fn guid_of(schedule: &JobSchedule) -> Option<String> {
    schedule
        .id
        .as_deref()
        .and_then(|id| JobScheduleId::parse_insensitively(id).ok())
        .map(|id| id.job_schedule_id)
        .or_else(|| schedule.properties.job_schedule_id.clone())
}

impl AutomationJobScheduleResource {
    /// Finds the job schedule linking the runbook and schedule named in `id`
    async fn find(
        &self,
        ctx: &Context,
        provider_data: &AzureProviderData,
        id: &AutomationJobScheduleId,
        job_schedule_id: Option<&str>,
    ) -> Result<Option<JobSchedule>, crate::api::ApiError> {
        let api = provider_data.client.automation().job_schedules();

        if let Some(guid) = job_schedule_id {
            let arm_id = JobScheduleId::new(
                &id.subscription_id,
                &id.resource_group_name,
                &id.automation_account_name,
                guid,
            );
            return match api.get(ctx, &arm_id).await {
                Ok(schedule) => Ok(Some(schedule)),
                Err(e) if e.is_not_found() => Ok(None),
                Err(e) => Err(e),
            };
        }

        match api.list(ctx, &id.automation_account_id()).await {
            Ok(schedules) => Ok(schedules.into_iter().find(|s| matches_link(s, id))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Resource for AutomationJobScheduleResource {
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
        let mut diagnostics = vec![];
        let ctx = self.timeouts.context_for(ctx, Operation::Create);

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

        let config = match extract_config(&provider_data.subscription_id, &request.config) {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        };

        match self.find(&ctx, provider_data, &config.id, None).await {
            Ok(Some(_)) => {
                diagnostics.push(requires_import(TYPE_NAME, &config.id.id()));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
            Ok(None) => {}
            Err(e) => {
                diagnostics.push(api_error(
                    format!("checking for presence of existing {}", config.id),
                    &e,
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                };
            }
        }

        let guid = config
            .job_schedule_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let account = config.account_id();
        let arm_id = JobScheduleId::new(
            account.subscription_id,
            account.resource_group_name,
            account.automation_account_name,
            &guid,
        );

        tracing::debug!(id = %config.id.id(), job_schedule_id = %guid, "Creating automation job schedule");

        let properties = JobScheduleProperties {
            job_schedule_id: None,
            schedule: NameReference {
                name: config.id.schedule_name.clone(),
            },
            runbook: NameReference {
                name: config.id.runbook_name.clone(),
            },
            run_on: config.run_on.clone(),
            parameters: config.parameters.clone(),
        };

        let provider_api = provider_data.client.automation();
        match provider_api.job_schedules().create(&ctx, &arm_id, properties).await {
            Ok(_) => {
                let mut new_state = request.planned_state;
                set_attr(&mut new_state, "id", Dynamic::String(config.id.id()));
                set_attr(&mut new_state, "job_schedule_id", Dynamic::String(guid));
                CreateResourceResponse {
                    new_state,
                    diagnostics,
                }
            }
            Err(e) => {
                diagnostics.push(api_error(format!("creating {}", config.id), &e));
                CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics,
                }
            }
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];
        let ctx = self.timeouts.context_for(ctx, Operation::Read);

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let raw_id = request
            .current_state
            .get_string(&AttributePath::new("id"))
            .unwrap_or_default();
        let id = match AutomationJobScheduleId::parse(&raw_id) {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(Diagnostic::error("Invalid resource ID", e.to_string()));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let stored_guid = optional_string(&request.current_state, "job_schedule_id");
        let schedule = match self.find(&ctx, provider_data, &id, stored_guid.as_deref()).await {
            Ok(Some(schedule)) => schedule,
            Ok(None) => {
                tracing::debug!(id = %id.id(), "Automation job schedule was not found, removing from state");
                return ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                };
            }
            Err(e) => {
                diagnostics.push(api_error(format!("retrieving {}", id), &e));
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                };
            }
        };

        let mut new_state = request.current_state.clone();
        set_attr(&mut new_state, "id", Dynamic::String(id.id()));
        set_attr(
            &mut new_state,
            "resource_group_name",
            Dynamic::String(id.resource_group_name.clone()),
        );
        set_attr(
            &mut new_state,
            "automation_account_name",
            Dynamic::String(id.automation_account_name.clone()),
        );
        set_attr(
            &mut new_state,
            "runbook_name",
            Dynamic::String(schedule.properties.runbook.name.clone()),
        );
        set_attr(
            &mut new_state,
            "schedule_name",
            Dynamic::String(schedule.properties.schedule.name.clone()),
        );
        set_attr(
            &mut new_state,
            "run_on",
            super::optional_dynamic(schedule.properties.run_on.clone()),
        );
        if !schedule.properties.parameters.is_empty() {
            set_attr(
                &mut new_state,
                "parameters",
                Dynamic::Map(
                    schedule
                        .properties
                        .parameters
                        .iter()
                        .map(|(k, v)| (k.clone(), Dynamic::String(v.clone())))
                        .collect(),
                ),
            );
        }
        if let Some(guid) = guid_of(&schedule).or(stored_guid) {
            set_attr(&mut new_state, "job_schedule_id", Dynamic::String(guid));
        }

        ReadResourceResponse {
            new_state: Some(new_state),
            diagnostics,
        }
    }

    async fn update(&self, _ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        // every argument forces replacement, so there is nothing to send
        UpdateResourceResponse {
            new_state: request.planned_state,
            diagnostics: vec![],
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = vec![];
        let ctx = self.timeouts.context_for(ctx, Operation::Delete);

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return DeleteResourceResponse { diagnostics };
            }
        };

        let raw_id = request
            .prior_state
            .get_string(&AttributePath::new("id"))
            .unwrap_or_default();
        let id = match AutomationJobScheduleId::parse(&raw_id) {
            Ok(id) => id,
            Err(e) => {
                diagnostics.push(Diagnostic::error("Invalid resource ID", e.to_string()));
                return DeleteResourceResponse { diagnostics };
            }
        };

        let stored_guid = optional_string(&request.prior_state, "job_schedule_id");
        let guid = match stored_guid {
            Some(guid) => guid,
            None => match self.find(&ctx, provider_data, &id, None).await {
                Ok(Some(schedule)) => match guid_of(&schedule) {
                    Some(guid) => guid,
                    None => return DeleteResourceResponse { diagnostics },
                },
                Ok(None) => return DeleteResourceResponse { diagnostics },
                Err(e) => {
                    diagnostics.push(api_error(format!("retrieving {}", id), &e));
                    return DeleteResourceResponse { diagnostics };
                }
            },
        };

        let arm_id = JobScheduleId::new(
            &id.subscription_id,
            &id.resource_group_name,
            &id.automation_account_name,
            guid,
        );
        if let Err(e) = provider_data
            .client
            .automation()
            .job_schedules()
            .delete(&ctx, &arm_id)
            .await
        {
            diagnostics.push(api_error(format!("deleting {}", id), &e));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for AutomationJobScheduleResource {
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
impl ResourceWithUpgradeState for AutomationJobScheduleResource {
    async fn upgrade_state(
        &self,
        ctx: Context,
        request: UpgradeResourceStateRequest,
    ) -> UpgradeResourceStateResponse {
        upgrade_resource_state(
            &ctx,
            &request,
            SCHEMA_VERSION,
            &Self::upgraders(),
            self.provider_data.as_ref(),
        )
    }
}

#[async_trait]
impl ResourceWithImportState for AutomationJobScheduleResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse::default();
        import_state_validating_id(
            &ctx,
            |id| AutomationJobScheduleId::parse(id).map(|_| ()),
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

    const ACCOUNT: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1";
    const ID: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1/runBook/book1/schedule/schedule1";
    const GUID: &str = "0fa462ba-3aa2-4138-83ca-9ebc3bc55cdc";

    async fn configured(url: &str) -> AutomationJobScheduleResource {
        let mut resource = AutomationJobScheduleResource::new();
        let response = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: Some(Arc::new(provider_data(url))),
                },
            )
            .await;
        assert!(response.diagnostics.is_empty());
        resource
    }

    fn config() -> DynamicValue {
        object(vec![
            ("resource_group_name", s("group1")),
            ("automation_account_name", s("account1")),
            ("runbook_name", s("book1")),
            ("schedule_name", s("schedule1")),
            ("job_schedule_id", s(GUID)),
        ])
    }

    #[tokio::test]
    async fn create_stores_name_based_id_and_guid() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", format!("{}/jobSchedules?api-version=2023-11-01", ACCOUNT).as_str())
            .with_body(r#"{"value":[]}"#)
            .create_async()
            .await;
        let put = server
            .mock(
                "PUT",
                format!("{}/jobSchedules/{}?api-version=2023-11-01", ACCOUNT, GUID).as_str(),
            )
            .match_body(Matcher::PartialJson(serde_json::json!({
                "properties": {"runbook": {"name": "book1"}, "schedule": {"name": "schedule1"}}
            })))
            .with_status(201)
            .with_body(r#"{"properties":{"runbook":{"name":"book1"},"schedule":{"name":"schedule1"}}}"#)
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
            ID
        );
        assert_eq!(
            response
                .new_state
                .get_string(&AttributePath::new("job_schedule_id"))
                .unwrap(),
            GUID
        );
        put.assert_async().await;
    }

    #[tokio::test]
    async fn create_refuses_to_adopt_existing_link() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", format!("{}/jobSchedules?api-version=2023-11-01", ACCOUNT).as_str())
            .with_body(
                serde_json::json!({"value": [{
                    "id": format!("{}/jobSchedules/{}", ACCOUNT, GUID),
                    "properties": {"runbook": {"name": "book1"}, "schedule": {"name": "schedule1"}}
                }]})
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

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Resource already exists");
    }

    #[tokio::test]
    async fn read_removes_missing_job_schedule() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock(
                "GET",
                format!("{}/jobSchedules/{}?api-version=2023-11-01", ACCOUNT, GUID).as_str(),
            )
            .with_status(404)
            .create_async()
            .await;

        let resource = configured(&server.url()).await;
        let state = object(vec![("id", s(ID)), ("job_schedule_id", s(GUID))]);
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    current_state: state,
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn read_without_guid_finds_link_by_names() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", format!("{}/jobSchedules?api-version=2023-11-01", ACCOUNT).as_str())
            .with_body(
                serde_json::json!({"value": [{
                    "id": format!("{}/JobSchedules/{}", ACCOUNT, GUID),
                    "properties": {
                        "runbook": {"name": "book1"},
                        "schedule": {"name": "schedule1"},
                        "parameters": {"env": "prod"}
                    }
                }]})
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
                    current_state: object(vec![("id", s(ID))]),
                },
            )
            .await;

        let state = response.new_state.unwrap();
        assert_eq!(
            state.get_string(&AttributePath::new("job_schedule_id")).unwrap(),
            GUID
        );
        assert_eq!(
            state
                .get_string(&AttributePath::new("parameters").key("env"))
                .unwrap(),
            "prod"
        );
    }

    #[tokio::test]
    async fn read_rejects_malformed_id() {
        let resource = configured("http://127.0.0.1:1").await;
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: TYPE_NAME.to_string(),
                    current_state: object(vec![(
                        "id",
                        s(&format!("{}/jobSchedules/{}", ACCOUNT, GUID)),
                    )]),
                },
            )
            .await;
        assert_eq!(response.diagnostics[0].summary, "Invalid resource ID");
    }

    #[tokio::test]
    async fn upgrade_rewrites_v0_state() {
        let resource = AutomationJobScheduleResource::new();
        let raw = serde_json::json!({
            "id": format!("{}/jobSchedules/{}", ACCOUNT, GUID),
            "runbook_name": "book1",
            "schedule_name": "schedule1"
        });
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

        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response
                .upgraded_state
                .get_string(&AttributePath::new("id"))
                .unwrap(),
            ID
        );
    }

    #[tokio::test]
    async fn import_requires_name_based_id() {
        let resource = AutomationJobScheduleResource::new();

        let ok = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    id: ID.to_string(),
                },
            )
            .await;
        assert_eq!(ok.imported_resources.len(), 1);

        let rejected = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: TYPE_NAME.to_string(),
                    id: format!("{}/jobSchedules/{}", ACCOUNT, GUID),
                },
            )
            .await;
        assert!(rejected.imported_resources.is_empty());
        assert_eq!(rejected.diagnostics[0].summary, "Invalid import ID");
    }

    #[test]
    fn schema_rejects_malformed_job_schedule_id() {
        let mut bad = config();
        bad.set_string(&AttributePath::new("job_schedule_id"), "not-a-guid".into())
            .unwrap();
        let diags = schema_definition().validate_config(&bad);
        assert!(diags.iter().any(|d| d.is_error()));

        assert!(schema_definition()
            .validate_config(&config())
            .iter()
            .all(|d| !d.is_error()));
    }
}
