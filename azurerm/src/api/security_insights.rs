//! Microsoft Sentinel (Microsoft.SecurityInsights 2024-09-01)

use super::common::{ArmResource, ListResponse};
use super::{ApiError, Client};
use crate::ids::{AlertRuleTemplateId, AutomationRuleId, WatchlistId, WorkspaceId};
use crate::resourceids::ResourceId;
use serde::{Deserialize, Serialize};
use tfplug::Context;

pub const API_VERSION: &str = "2024-09-01";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistProperties {
    pub display_name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub items_search_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_duration: Option<String>,
}

pub type Watchlist = ArmResource<WatchlistProperties>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyConditionValues {
    pub property_name: String,
    pub operator: String,
    #[serde(default)]
    pub property_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "conditionType")]
pub enum AutomationRuleCondition {
    Property {
        #[serde(rename = "conditionProperties")]
        properties: PropertyConditionValues,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyPropertiesConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<IncidentOwner>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<IncidentLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentOwner {
    pub object_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentLabel {
    pub label_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPlaybookConfiguration {
    pub logic_app_resource_id: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "actionType")]
pub enum AutomationRuleAction {
    ModifyProperties {
        order: i64,
        #[serde(rename = "actionConfiguration")]
        configuration: ModifyPropertiesConfiguration,
    },
    RunPlaybook {
        order: i64,
        #[serde(rename = "actionConfiguration")]
        configuration: RunPlaybookConfiguration,
    },
}

impl AutomationRuleAction {
    pub fn order(&self) -> i64 {
        match self {
            AutomationRuleAction::ModifyProperties { order, .. }
            | AutomationRuleAction::RunPlaybook { order, .. } => *order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeringLogic {
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time_utc: Option<String>,
    pub triggers_on: String,
    pub triggers_when: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<AutomationRuleCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRuleProperties {
    pub display_name: String,
    pub order: i64,
    pub triggering_logic: TriggeringLogic,
    #[serde(default)]
    pub actions: Vec<AutomationRuleAction>,
}

pub type AutomationRule = ArmResource<AutomationRuleProperties>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRuleTemplateProperties {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub tactics: Vec<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub query_frequency: Option<String>,
    #[serde(default)]
    pub query_period: Option<String>,
    #[serde(default)]
    pub trigger_operator: Option<String>,
    #[serde(default)]
    pub trigger_threshold: Option<i64>,
    #[serde(default)]
    pub product_filter: Option<String>,
}

/// Alert rule templates are polymorphic on `kind`
#[derive(Debug, Clone, Deserialize)]
pub struct AlertRuleTemplate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub properties: AlertRuleTemplateProperties,
}

pub struct SecurityInsightsApi<'a> {
    client: &'a Client,
}

impl<'a> SecurityInsightsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn watchlists(&self) -> WatchlistsApi<'a> {
        WatchlistsApi {
            client: self.client,
        }
    }

    pub fn automation_rules(&self) -> AutomationRulesApi<'a> {
        AutomationRulesApi {
            client: self.client,
        }
    }

    pub fn alert_rule_templates(&self) -> AlertRuleTemplatesApi<'a> {
        AlertRuleTemplatesApi {
            client: self.client,
        }
    }
}

pub struct WatchlistsApi<'a> {
    client: &'a Client,
}

impl<'a> WatchlistsApi<'a> {
    pub async fn get(&self, ctx: &Context, id: &WatchlistId) -> Result<Watchlist, ApiError> {
        self.client.get(ctx, &id.id(), API_VERSION).await
    }

    pub async fn create_or_update(
        &self,
        ctx: &Context,
        id: &WatchlistId,
        properties: WatchlistProperties,
    ) -> Result<Watchlist, ApiError> {
        self.client
            .put(ctx, &id.id(), API_VERSION, &ArmResource::new(properties))
            .await
    }

    pub async fn delete(&self, ctx: &Context, id: &WatchlistId) -> Result<(), ApiError> {
        self.client.delete(ctx, &id.id(), API_VERSION).await
    }
}

pub struct AutomationRulesApi<'a> {
    client: &'a Client,
}

impl<'a> AutomationRulesApi<'a> {
    pub async fn get(&self, ctx: &Context, id: &AutomationRuleId) -> Result<AutomationRule, ApiError> {
        self.client.get(ctx, &id.id(), API_VERSION).await
    }

    /// The etag from a previous read guards against concurrent edits
    pub async fn create_or_update(
        &self,
        ctx: &Context,
        id: &AutomationRuleId,
        properties: AutomationRuleProperties,
        etag: Option<String>,
    ) -> Result<AutomationRule, ApiError> {
        let body = ArmResource::new(properties).with_etag(etag);
        self.client.put(ctx, &id.id(), API_VERSION, &body).await
    }

    pub async fn delete(&self, ctx: &Context, id: &AutomationRuleId) -> Result<(), ApiError> {
        self.client.delete(ctx, &id.id(), API_VERSION).await
    }
}

pub struct AlertRuleTemplatesApi<'a> {
    client: &'a Client,
}

impl<'a> AlertRuleTemplatesApi<'a> {
    pub async fn get(
        &self,
        ctx: &Context,
        id: &AlertRuleTemplateId,
    ) -> Result<AlertRuleTemplate, ApiError> {
        self.client.get(ctx, &id.id(), API_VERSION).await
    }

    pub async fn list(
        &self,
        ctx: &Context,
        workspace: &WorkspaceId,
    ) -> Result<Vec<AlertRuleTemplate>, ApiError> {
        let path = format!(
            "{}/providers/Microsoft.SecurityInsights/alertRuleTemplates",
            workspace.id()
        );
        let page: ListResponse<AlertRuleTemplate> =
            self.client.get(ctx, &path, API_VERSION).await?;
        Ok(page.value)
    }
}
