//! Azure Resource Manager provider
//!
//! Resource IDs are parsed and formatted by [`resourceids`]; the typed IDs of
//! every managed resource type live in [`ids`]. [`AzureRmProvider`] wires the
//! resources and data sources up to a configured ARM client.

pub mod resourceids;

pub mod api;
pub mod data_sources;
pub mod ids;
pub mod locks;
pub mod logging;
pub mod migration;
pub mod provider_data;
pub mod resources;

use async_trait::async_trait;
use provider_data::AzureProviderData;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

const ENV_SUBSCRIPTION_ID: &str = "ARM_SUBSCRIPTION_ID";
const ENV_ACCESS_TOKEN: &str = "ARM_ACCESS_TOKEN";
const ENV_ENDPOINT: &str = "ARM_ENDPOINT";

#[derive(Default)]
pub struct AzureRmProvider {
    provider_data: Option<AzureProviderData>,
}

impl AzureRmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider_data(&self) -> Option<&AzureProviderData> {
        self.provider_data.as_ref()
    }
}

/// Provider block value, falling back to the environment variable
fn setting(config: &DynamicValue, name: &str, env: &str) -> Option<String> {
    config
        .get_string(&AttributePath::new(name))
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var(env).ok().filter(|s| !s.is_empty()))
}

fn automation_job_schedule() -> Box<dyn ResourceWithConfigure> {
    Box::new(resources::AutomationJobScheduleResource::new())
}

fn search_shared_private_link_service() -> Box<dyn ResourceWithConfigure> {
    Box::new(resources::SearchSharedPrivateLinkServiceResource::new())
}

fn sentinel_watchlist() -> Box<dyn ResourceWithConfigure> {
    Box::new(resources::SentinelWatchlistResource::new())
}

fn sentinel_automation_rule() -> Box<dyn ResourceWithConfigure> {
    Box::new(resources::SentinelAutomationRuleResource::new())
}

fn resource_group_policy_remediation() -> Box<dyn ResourceWithConfigure> {
    Box::new(resources::ResourceGroupPolicyRemediationResource::new())
}

fn sentinel_alert_rule_template() -> Box<dyn DataSourceWithConfigure> {
    Box::new(data_sources::SentinelAlertRuleTemplateDataSource::new())
}

#[async_trait]
impl Provider for AzureRmProvider {
    fn type_name(&self) -> &str {
        "azurerm"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Azure Resource Manager")
            .attribute(
                AttributeBuilder::new("subscription_id", AttributeType::String)
                    .description("Subscription to manage. Can also be set with ARM_SUBSCRIPTION_ID.")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_token", AttributeType::String)
                    .description("Bearer token for Azure Resource Manager. Can also be set with ARM_ACCESS_TOKEN.")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("endpoint", AttributeType::String)
                    .description("Resource Manager endpoint. Can also be set with ARM_ENDPOINT.")
                    .optional()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        logging::init();
        let mut diagnostics = vec![];

        let subscription_id = setting(&request.config, "subscription_id", ENV_SUBSCRIPTION_ID);
        let access_token = setting(&request.config, "access_token", ENV_ACCESS_TOKEN);
        let endpoint = setting(&request.config, "endpoint", ENV_ENDPOINT)
            .unwrap_or_else(|| api::DEFAULT_ENDPOINT.to_string());

        match (subscription_id, access_token) {
            (Some(subscription_id), Some(access_token)) => {
                match api::Client::new(&endpoint, &access_token) {
                    Ok(client) => {
                        tracing::info!(endpoint = %endpoint, "Configured Azure Resource Manager client");
                        self.provider_data = Some(AzureProviderData::new(client, subscription_id));
                    }
                    Err(e) => diagnostics.push(Diagnostic::error(
                        "Failed to create API client",
                        e.to_string(),
                    )),
                }
            }
            (None, _) => diagnostics.push(Diagnostic::error(
                "Missing subscription_id",
                "subscription_id is required (set in provider config or ARM_SUBSCRIPTION_ID env var)",
            )),
            (_, None) => diagnostics.push(Diagnostic::error(
                "Missing access_token",
                "access_token is required (set in provider config or ARM_ACCESS_TOKEN env var)",
            )),
        }

        let provider_data = self
            .provider_data
            .clone()
            .map(|data| Arc::new(data) as Arc<dyn std::any::Any + Send + Sync>);

        ConfigureProviderResponse {
            diagnostics,
            provider_data,
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources = HashMap::new();
        resources.insert(
            "azurerm_automation_job_schedule".to_string(),
            automation_job_schedule as ResourceFactory,
        );
        resources.insert(
            "azurerm_search_shared_private_link_service".to_string(),
            search_shared_private_link_service as ResourceFactory,
        );
        resources.insert(
            "azurerm_sentinel_watchlist".to_string(),
            sentinel_watchlist as ResourceFactory,
        );
        resources.insert(
            "azurerm_sentinel_automation_rule".to_string(),
            sentinel_automation_rule as ResourceFactory,
        );
        resources.insert(
            "azurerm_resource_group_policy_remediation".to_string(),
            resource_group_policy_remediation as ResourceFactory,
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources = HashMap::new();
        data_sources.insert(
            "azurerm_sentinel_alert_rule_template".to_string(),
            sentinel_alert_rule_template as DataSourceFactory,
        );
        data_sources
    }
}
