use super::state::RawStateExt;
use crate::ids::{AutomationJobScheduleId, JobScheduleId};
use crate::provider_data::AzureProviderData;
use crate::resourceids::ResourceId;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::upgrade::{RawStateMap, StateUpgrade};
use tfplug::{Context, Result, TfplugError};

/// Version 0 stored the ARM job schedule ID, which embeds a GUID. Version 1
/// addresses the job schedule by runbook and schedule name instead and keeps
/// the GUID in `job_schedule_id`.
pub struct AutomationJobScheduleV0ToV1;

impl StateUpgrade<AzureProviderData> for AutomationJobScheduleV0ToV1 {
    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("resource_group_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("automation_account_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("runbook_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("schedule_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "parameters",
                    AttributeType::Map(Box::new(AttributeType::String)),
                )
                .optional()
                .build(),
            )
            .attribute(
                AttributeBuilder::new("run_on", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("job_schedule_id", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .build()
    }

    fn upgrade(
        &self,
        _ctx: &Context,
        mut raw_state: RawStateMap,
        _meta: Option<&AzureProviderData>,
    ) -> Result<RawStateMap> {
        let old_id = match raw_state.non_empty_string("id") {
            Some(id) => id.to_string(),
            None => return Ok(raw_state),
        };

        let old = JobScheduleId::parse_insensitively(&old_id)
            .map_err(|e| TfplugError::UpgradeFailed(format!("parsing `id`: {}", e)))?;

        let new_id = AutomationJobScheduleId::new(
            &old.subscription_id,
            &old.resource_group_name,
            &old.automation_account_name,
            raw_state.require_string("runbook_name")?,
            raw_state.require_string("schedule_name")?,
        );

        tracing::debug!(old_id = %old_id, new_id = %new_id.id(), "Upgrading automation job schedule ID");

        raw_state.set_string("id", new_id.id());
        if raw_state.non_empty_string("job_schedule_id").is_none() {
            raw_state.set_string("job_schedule_id", old.job_schedule_id);
        }
        Ok(raw_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: serde_json::Value) -> RawStateMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test state must be an object"),
        }
    }

    const OLD_ID: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1/jobSchedules/0fa462ba-3aa2-4138-83ca-9ebc3bc55cdc";

    #[test]
    fn empty_state_is_unchanged() {
        let upgraded = AutomationJobScheduleV0ToV1
            .upgrade(&Context::new(), RawStateMap::new(), None)
            .unwrap();
        assert!(upgraded.is_empty());
    }

    #[test]
    fn rewrites_id_and_keeps_guid() {
        let raw = state(json!({
            "id": OLD_ID,
            "runbook_name": "book1",
            "schedule_name": "schedule1",
        }));

        let upgraded = AutomationJobScheduleV0ToV1
            .upgrade(&Context::new(), raw, None)
            .unwrap();

        assert_eq!(
            upgraded,
            state(json!({
                "id": "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1/runBook/book1/schedule/schedule1",
                "runbook_name": "book1",
                "schedule_name": "schedule1",
                "job_schedule_id": "0fa462ba-3aa2-4138-83ca-9ebc3bc55cdc",
            }))
        );
    }

    #[test]
    fn accepts_old_ids_in_any_casing() {
        let raw = state(json!({
            "id": OLD_ID.replace("jobSchedules", "JobSchedules").replace("resourceGroups", "resourcegroups"),
            "runbook_name": "book1",
            "schedule_name": "schedule1",
        }));

        let upgraded = AutomationJobScheduleV0ToV1
            .upgrade(&Context::new(), raw, None)
            .unwrap();
        assert!(upgraded
            .string("id")
            .unwrap()
            .contains("/resourceGroups/group1/"));
    }

    #[test]
    fn unparseable_id_fails() {
        let raw = state(json!({
            "id": "/subscriptions/sub1/resourceGroups/group1",
            "runbook_name": "book1",
            "schedule_name": "schedule1",
        }));

        let err = AutomationJobScheduleV0ToV1
            .upgrade(&Context::new(), raw, None)
            .unwrap_err();
        assert!(err.to_string().contains("parsing `id`"));
    }

    #[test]
    fn missing_runbook_name_fails() {
        let raw = state(json!({"id": OLD_ID, "schedule_name": "schedule1"}));
        let err = AutomationJobScheduleV0ToV1
            .upgrade(&Context::new(), raw, None)
            .unwrap_err();
        assert!(err.to_string().contains("`runbook_name`"));
    }
}
