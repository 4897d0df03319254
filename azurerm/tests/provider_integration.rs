use azurerm::AzureRmProvider;
use mockito::{Matcher, Server};
use serde_json::json;
use std::collections::HashMap;
use tfplug::data_source::{ConfigureDataSourceRequest, ReadDataSourceRequest};
use tfplug::provider::ConfigureProviderRequest;
use tfplug::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest,
};
use tfplug::{
    AttributePath, Context, DataSource, DataSourceWithConfigure, Dynamic, DynamicValue, Provider,
    Resource, ResourceWithConfigure,
};

const API_VERSION: &str = "api-version=2024-09-01";
const WORKSPACE: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.OperationalInsights/workspaces/workspace1";

fn object(values: Vec<(&str, &str)>) -> DynamicValue {
    DynamicValue::new(Dynamic::Map(
        values
            .into_iter()
            .map(|(k, v)| (k.to_string(), Dynamic::String(v.to_string())))
            .collect::<HashMap<_, _>>(),
    ))
}

async fn configured_provider(url: &str) -> (AzureRmProvider, ConfigureResourceRequest) {
    let mut provider = AzureRmProvider::new();
    let response = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                config: object(vec![
                    ("subscription_id", "12345678-1234-9876-4563-123456789012"),
                    ("access_token", "integration-token"),
                    ("endpoint", url),
                ]),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);

    let request = ConfigureResourceRequest {
        provider_data: response.provider_data,
    };
    (provider, request)
}

#[tokio::test]
async fn watchlist_lifecycle_through_provider() {
    let mut server = Server::new_async().await;
    let id = format!(
        "{}/providers/Microsoft.SecurityInsights/watchlists/list1",
        WORKSPACE
    );
    let path = format!("{}?{}", id, API_VERSION);

    let missing = server
        .mock("GET", path.as_str())
        .match_header("authorization", "Bearer integration-token")
        .with_status(404)
        .with_body(r#"{"error":{"code":"NotFound","message":"Watchlist not found"}}"#)
        .expect(1)
        .create_async()
        .await;
    let put = server
        .mock("PUT", path.as_str())
        .match_body(Matcher::PartialJson(json!({
            "properties": { "displayName": "Hosts", "itemsSearchKey": "Hostname" }
        })))
        .with_body(r#"{"properties":{"displayName":"Hosts","provider":"Microsoft","itemsSearchKey":"Hostname"}}"#)
        .create_async()
        .await;

    let (provider, configure) = configured_provider(&server.url()).await;
    let factory = provider.resources()["azurerm_sentinel_watchlist"];
    let mut resource = factory();
    let configured = resource.configure(Context::new(), configure).await;
    assert!(configured.diagnostics.is_empty());

    let config = object(vec![
        ("name", "list1"),
        ("log_analytics_workspace_id", WORKSPACE),
        ("display_name", "Hosts"),
        ("item_search_key", "Hostname"),
    ]);
    let created = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "azurerm_sentinel_watchlist".to_string(),
                planned_state: config.clone(),
                config,
            },
        )
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(
        created.new_state.get_string(&AttributePath::new("id")).unwrap(),
        id
    );
    missing.assert_async().await;
    put.assert_async().await;

    // the host persists state in msgpack form between operations
    let stored = created.new_state.encode_msgpack().unwrap();
    let current_state = DynamicValue::decode_msgpack(&stored).unwrap();
    assert_eq!(current_state, created.new_state);

    missing.remove_async().await;
    let _get = server
        .mock("GET", path.as_str())
        .with_body(r#"{"properties":{"displayName":"Hosts","provider":"Microsoft","itemsSearchKey":"Hostname"}}"#)
        .create_async()
        .await;

    let read = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "azurerm_sentinel_watchlist".to_string(),
                current_state,
            },
        )
        .await;
    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    let state = read.new_state.unwrap();
    assert_eq!(
        state.get_string(&AttributePath::new("item_search_key")).unwrap(),
        "Hostname"
    );

    let delete = server
        .mock("DELETE", path.as_str())
        .with_status(200)
        .create_async()
        .await;
    let deleted = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "azurerm_sentinel_watchlist".to_string(),
                prior_state: state,
            },
        )
        .await;
    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    delete.assert_async().await;
}

#[tokio::test]
async fn alert_rule_template_lookup_through_provider() {
    let mut server = Server::new_async().await;
    let id = format!(
        "{}/providers/Microsoft.SecurityInsights/alertRuleTemplates/65360bb0-8986-4ade-a89d-af3cf44d28aa",
        WORKSPACE
    );
    let _get = server
        .mock("GET", format!("{}?{}", id, API_VERSION).as_str())
        .with_body(
            json!({
                "id": id,
                "name": "65360bb0-8986-4ade-a89d-af3cf44d28aa",
                "kind": "MicrosoftSecurityIncidentCreation",
                "properties": {
                    "displayName": "Create incidents based on Defender alerts",
                    "productFilter": "Microsoft Defender Advanced Threat Protection"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, configure) = configured_provider(&server.url()).await;
    let factory = provider.data_sources()["azurerm_sentinel_alert_rule_template"];
    let mut data_source = factory();
    data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: configure.provider_data,
            },
        )
        .await;

    let response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "azurerm_sentinel_alert_rule_template".to_string(),
                config: object(vec![
                    ("log_analytics_workspace_id", WORKSPACE),
                    ("name", "65360bb0-8986-4ade-a89d-af3cf44d28aa"),
                ]),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(response.state.get_string(&AttributePath::new("id")).unwrap(), id);
    assert_eq!(
        response
            .state
            .get_string(
                &AttributePath::new("security_incident_template")
                    .index(0)
                    .attribute("product_filter")
            )
            .unwrap(),
        "Microsoft Defender Advanced Threat Protection"
    );
}

#[tokio::test]
async fn unconfigured_resource_reports_diagnostic() {
    let provider = AzureRmProvider::new();
    let factory = provider.resources()["azurerm_resource_group_policy_remediation"];
    let resource = factory();

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "azurerm_resource_group_policy_remediation".to_string(),
                prior_state: object(vec![("id", "/subscriptions/sub1")]),
            },
        )
        .await;
    assert_eq!(response.diagnostics.len(), 1);
}
