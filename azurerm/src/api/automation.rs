//! Automation job schedules (Microsoft.Automation 2023-11-01)

use super::common::{ArmResource, ListResponse};
use super::{ApiError, Client};
use crate::ids::{AutomationAccountId, JobScheduleId};
use crate::resourceids::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tfplug::Context;

pub const API_VERSION: &str = "2023-11-01";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameReference {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobScheduleProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_schedule_id: Option<String>,
    pub schedule: NameReference,
    pub runbook: NameReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_on: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, String>,
}

pub type JobSchedule = ArmResource<JobScheduleProperties>;

pub struct AutomationApi<'a> {
    client: &'a Client,
}

impl<'a> AutomationApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn job_schedules(&self) -> JobSchedulesApi<'a> {
        JobSchedulesApi {
            client: self.client,
        }
    }
}

/// Job schedules link a runbook to a schedule. They cannot be updated in place.
pub struct JobSchedulesApi<'a> {
    client: &'a Client,
}

impl<'a> JobSchedulesApi<'a> {
    /// GET .../automationAccounts/{account}/jobSchedules/{guid}
    pub async fn get(&self, ctx: &Context, id: &JobScheduleId) -> Result<JobSchedule, ApiError> {
        self.client.get(ctx, &id.id(), API_VERSION).await
    }

    /// GET .../automationAccounts/{account}/jobSchedules
    pub async fn list(
        &self,
        ctx: &Context,
        account: &AutomationAccountId,
    ) -> Result<Vec<JobSchedule>, ApiError> {
        let path = format!("{}/jobSchedules", account.id());
        let page: ListResponse<JobSchedule> = self.client.get(ctx, &path, API_VERSION).await?;
        Ok(page.value)
    }

    /// PUT .../automationAccounts/{account}/jobSchedules/{guid}
    pub async fn create(
        &self,
        ctx: &Context,
        id: &JobScheduleId,
        properties: JobScheduleProperties,
    ) -> Result<JobSchedule, ApiError> {
        self.client
            .put(ctx, &id.id(), API_VERSION, &ArmResource::new(properties))
            .await
    }

    /// DELETE .../automationAccounts/{account}/jobSchedules/{guid}
    pub async fn delete(&self, ctx: &Context, id: &JobScheduleId) -> Result<(), ApiError> {
        self.client.delete(ctx, &id.id(), API_VERSION).await
    }
}
