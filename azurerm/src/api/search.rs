//! Search shared private link resources (Microsoft.Search 2023-11-01)

use super::common::ArmResource;
use super::{ApiError, Client};
use crate::ids::SharedPrivateLinkResourceId;
use crate::resourceids::ResourceId;
use serde::{Deserialize, Serialize};
use tfplug::Context;

pub const API_VERSION: &str = "2023-11-01";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPrivateLinkResourceProperties {
    pub private_link_resource_id: String,
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_region: Option<String>,
    #[serde(default, skip_serializing)]
    pub status: Option<String>,
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
}

pub type SharedPrivateLinkResource = ArmResource<SharedPrivateLinkResourceProperties>;

pub struct SearchApi<'a> {
    client: &'a Client,
}

impl<'a> SearchApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn shared_private_link_resources(&self) -> SharedPrivateLinkResourcesApi<'a> {
        SharedPrivateLinkResourcesApi {
            client: self.client,
        }
    }
}

pub struct SharedPrivateLinkResourcesApi<'a> {
    client: &'a Client,
}

impl<'a> SharedPrivateLinkResourcesApi<'a> {
    pub async fn get(
        &self,
        ctx: &Context,
        id: &SharedPrivateLinkResourceId,
    ) -> Result<SharedPrivateLinkResource, ApiError> {
        self.client.get(ctx, &id.id(), API_VERSION).await
    }

    /// Creates or updates the resource and waits for provisioning
    pub async fn create_or_update(
        &self,
        ctx: &Context,
        id: &SharedPrivateLinkResourceId,
        properties: SharedPrivateLinkResourceProperties,
    ) -> Result<SharedPrivateLinkResource, ApiError> {
        self.client
            .put(ctx, &id.id(), API_VERSION, &ArmResource::new(properties))
            .await
    }

    pub async fn delete(
        &self,
        ctx: &Context,
        id: &SharedPrivateLinkResourceId,
    ) -> Result<(), ApiError> {
        self.client.delete(ctx, &id.id(), API_VERSION).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_fields_are_not_sent() {
        let body = ArmResource::new(SharedPrivateLinkResourceProperties {
            private_link_resource_id: "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Storage/storageAccounts/acc1".into(),
            group_id: "blob".into(),
            request_message: Some("please approve".into()),
            resource_region: None,
            status: Some("Approved".into()),
            provisioning_state: Some("Succeeded".into()),
        });

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "properties": {
                    "privateLinkResourceId": "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Storage/storageAccounts/acc1",
                    "groupId": "blob",
                    "requestMessage": "please approve"
                }
            })
        );
    }

    #[test]
    fn response_status_is_read() {
        let resource: SharedPrivateLinkResource = serde_json::from_str(
            r#"{"name":"link1","properties":{"privateLinkResourceId":"x","groupId":"blob","status":"Pending","provisioningState":"Succeeded"}}"#,
        )
        .unwrap();
        assert_eq!(resource.properties.status.as_deref(), Some("Pending"));
        assert_eq!(resource.name.as_deref(), Some("link1"));
    }
}
