//! Policy remediations (Microsoft.PolicyInsights 2021-10-01)

use super::common::ArmResource;
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};
use tfplug::Context;

pub const API_VERSION: &str = "2021-10-01";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationProperties {
    pub policy_assignment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_definition_reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_discovery_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<RemediationFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_deployments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<FailureThreshold>,
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureThreshold {
    pub percentage: f64,
}

pub type Remediation = ArmResource<RemediationProperties>;

/// Remediations can live at any scope; callers pass the full remediation ID
pub struct PolicyInsightsApi<'a> {
    client: &'a Client,
}

impl<'a> PolicyInsightsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get_remediation(&self, ctx: &Context, id: &str) -> Result<Remediation, ApiError> {
        self.client.get(ctx, id, API_VERSION).await
    }

    pub async fn create_or_update_remediation(
        &self,
        ctx: &Context,
        id: &str,
        properties: RemediationProperties,
    ) -> Result<Remediation, ApiError> {
        self.client
            .put(ctx, id, API_VERSION, &ArmResource::new(properties))
            .await
    }

    /// Stops a running remediation. Needed before a remediation that is
    /// still evaluating can be deleted.
    pub async fn cancel_remediation(&self, ctx: &Context, id: &str) -> Result<Remediation, ApiError> {
        self.client
            .post(ctx, &format!("{}/cancel", id), API_VERSION, &serde_json::json!({}))
            .await
    }

    pub async fn delete_remediation(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        self.client.delete(ctx, id, API_VERSION).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_test_client;
    use mockito::Server;

    const ID: &str = "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.PolicyInsights/remediations/fix1";

    #[tokio::test]
    async fn cancel_posts_to_cancel_action() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", format!("{}/cancel?api-version={}", ID, API_VERSION).as_str())
            .with_body(r#"{"properties":{"policyAssignmentId":"a","provisioningState":"Cancelling"}}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let remediation = client
            .policy_insights()
            .cancel_remediation(&Context::new(), ID)
            .await
            .unwrap();
        assert_eq!(
            remediation.properties.provisioning_state.as_deref(),
            Some("Cancelling")
        );
        mock.assert_async().await;
    }
}
