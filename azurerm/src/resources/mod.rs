//! Resource implementations
//!
//! Every resource follows the same shape: the schema is built by a free
//! function so `validate` can reuse it, create stores the typed ID's `id()`
//! in `id`, and read/update/delete parse the stored ID case-sensitively.

pub mod automation_job_schedule;
pub mod policy_remediation;
pub mod search_shared_private_link_service;
pub mod sentinel_automation_rule;
pub mod sentinel_watchlist;

pub use automation_job_schedule::AutomationJobScheduleResource;
pub use policy_remediation::ResourceGroupPolicyRemediationResource;
pub use search_shared_private_link_service::SearchSharedPrivateLinkServiceResource;
pub use sentinel_automation_rule::SentinelAutomationRuleResource;
pub use sentinel_watchlist::SentinelWatchlistResource;

use crate::api::ApiError;
use crate::provider_data::AzureProviderData;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::TfplugError;

/// Extracts [`AzureProviderData`] handed over by the provider's configure call
pub(crate) fn provider_data_from(
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
) -> (Option<AzureProviderData>, Vec<Diagnostic>) {
    match provider_data {
        Some(data) => match data.downcast_ref::<AzureProviderData>() {
            Some(data) => (Some(data.clone()), vec![]),
            None => (
                None,
                vec![Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract AzureProviderData from provider data",
                )],
            ),
        },
        None => (
            None,
            vec![Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            )],
        ),
    }
}

pub(crate) fn not_configured() -> Diagnostic {
    Diagnostic::error(
        "Provider not configured",
        "Provider data was not properly configured",
    )
}

pub(crate) fn api_error(summary: impl Into<String>, error: &ApiError) -> Diagnostic {
    Diagnostic::error(summary, format!("API error: {}", error))
}

/// Error returned when create finds the resource already present
pub(crate) fn requires_import(type_name: &str, id: &str) -> Diagnostic {
    Diagnostic::error(
        "Resource already exists",
        format!(
            "A resource with the ID {:?} already exists - to be managed via Terraform this resource needs to be imported into the State. Please see the resource documentation for {:?} for more information.",
            id, type_name
        ),
    )
}

pub(crate) fn required_string(value: &DynamicValue, name: &str) -> Result<String, Diagnostic> {
    value
        .get_string(&AttributePath::new(name))
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Diagnostic::error(
                format!("Missing {}", name),
                format!("The '{}' attribute is required", name),
            )
            .with_attribute(AttributePath::new(name))
        })
}

/// String attribute, None when null, unknown or empty
pub(crate) fn optional_string(value: &DynamicValue, name: &str) -> Option<String> {
    value
        .get_string(&AttributePath::new(name))
        .ok()
        .filter(|s| !s.is_empty())
}

pub(crate) fn string_list(value: &DynamicValue, name: &str) -> Vec<String> {
    value
        .get_list(&AttributePath::new(name))
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_string().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Objects held in a list attribute such as `condition_property`
pub(crate) fn object_list(value: &DynamicValue, name: &str) -> Vec<HashMap<String, Dynamic>> {
    value
        .get_list(&AttributePath::new(name))
        .map(|items| items.iter().filter_map(|item| item.as_map().cloned()).collect())
        .unwrap_or_default()
}

pub(crate) fn object_string(object: &HashMap<String, Dynamic>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(|v| v.as_string())
        .filter(|s| !s.is_empty())
        .cloned()
}

pub(crate) fn object_number(object: &HashMap<String, Dynamic>, key: &str) -> Option<f64> {
    object.get(key).and_then(|v| v.as_number())
}

pub(crate) fn object_string_list(object: &HashMap<String, Dynamic>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(|v| v.as_list())
        .map(|items| items.iter().filter_map(|i| i.as_string().cloned()).collect())
        .unwrap_or_default()
}

pub(crate) fn optional_dynamic(value: Option<String>) -> Dynamic {
    value.map(Dynamic::String).unwrap_or(Dynamic::Null)
}

pub(crate) fn string_list_dynamic(values: &[String]) -> Dynamic {
    Dynamic::List(values.iter().cloned().map(Dynamic::String).collect())
}

/// Validation callback for arguments holding a GUID
pub(crate) fn validate_uuid(input: &Dynamic, key: &str) -> (Vec<String>, Vec<TfplugError>) {
    match input.as_string().map(|s| uuid::Uuid::parse_str(s)) {
        Some(Ok(_)) => (vec![], vec![]),
        Some(Err(e)) => (
            vec![],
            vec![TfplugError::ValidationFailed(format!(
                "{:?} is not a valid UUID: {}",
                key, e
            ))],
        ),
        None => (
            vec![],
            vec![TfplugError::TypeMismatch {
                expected: format!("{} to be a string", key),
                actual: input.type_name().to_string(),
            }],
        ),
    }
}

fn duration_pattern() -> Option<&'static regex::Regex> {
    static PATTERN: OnceLock<Option<regex::Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            regex::Regex::new(r"^P(\d+Y)?(\d+M)?(\d+W)?(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?$").ok()
        })
        .as_ref()
}

/// Validation callback for ISO 8601 durations such as `P1DT12H`
pub(crate) fn validate_duration(input: &Dynamic, key: &str) -> (Vec<String>, Vec<TfplugError>) {
    let Some(value) = input.as_string() else {
        return (
            vec![],
            vec![TfplugError::TypeMismatch {
                expected: format!("{} to be a string", key),
                actual: input.type_name().to_string(),
            }],
        );
    };
    let matches = duration_pattern().map_or(false, |re| re.is_match(value));
    if matches && value != "P" && !value.ends_with('T') {
        (vec![], vec![])
    } else {
        (
            vec![],
            vec![TfplugError::ValidationFailed(format!(
                "{:?} must be an ISO 8601 duration, got {:?}",
                key, value
            ))],
        )
    }
}

/// Writes `value` under `name`, turning a non-object root into an object
pub(crate) fn set_attr(state: &mut DynamicValue, name: &str, value: Dynamic) {
    if let Err(e) = state.set(&AttributePath::new(name), value) {
        tracing::error!(attribute = name, "Failed to set state attribute: {}", e);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn provider_data_must_be_azure_provider_data() {
        let (data, diags) = provider_data_from(Some(Arc::new("not provider data".to_string())));
        assert!(data.is_none());
        assert_eq!(diags[0].summary, "Invalid provider data");

        let (data, diags) = provider_data_from(None);
        assert!(data.is_none());
        assert_eq!(diags[0].summary, "No provider data");
    }

    #[test]
    fn string_helpers_treat_empty_as_missing() {
        let value = object(vec![("name", s("")), ("other", s("x")), ("n", Dynamic::Number(1.0))]);
        assert!(required_string(&value, "name").is_err());
        assert_eq!(optional_string(&value, "other"), Some("x".to_string()));
        assert_eq!(optional_string(&value, "n"), None);
        assert_eq!(optional_string(&value, "absent"), None);
    }

    #[test]
    fn object_list_reads_nested_values() {
        let mut condition = HashMap::new();
        condition.insert("property".to_string(), s("IncidentTitle"));
        condition.insert(
            "values".to_string(),
            Dynamic::List(vec![s("a"), s("b")]),
        );
        let value = object(vec![(
            "condition_property",
            Dynamic::List(vec![Dynamic::Map(condition)]),
        )]);

        let objects = object_list(&value, "condition_property");
        assert_eq!(objects.len(), 1);
        assert_eq!(object_string(&objects[0], "property").as_deref(), Some("IncidentTitle"));
        assert_eq!(object_string_list(&objects[0], "values"), vec!["a", "b"]);
    }

    #[test]
    fn validate_uuid_rejects_names() {
        let (_, errors) = validate_uuid(&s("0fa462ba-3aa2-4138-83ca-9ebc3bc55cdc"), "name");
        assert!(errors.is_empty());

        let (_, errors) = validate_uuid(&s("rule1"), "name");
        assert!(matches!(errors[0], TfplugError::ValidationFailed(_)));
    }

    #[test]
    fn set_attr_writes_onto_null_and_object_state() {
        let mut state = DynamicValue::null();
        set_attr(&mut state, "id", s("/subscriptions/sub1"));
        set_attr(&mut state, "name", s("list1"));
        assert_eq!(
            state.get_string(&AttributePath::new("id")).unwrap(),
            "/subscriptions/sub1"
        );

        set_attr(&mut state, "name", s("list2"));
        assert_eq!(state.get_string(&AttributePath::new("name")).unwrap(), "list2");
    }

    #[test]
    fn duration_pattern_compiles() {
        assert!(duration_pattern().is_some());
    }

    #[test]
    fn validate_duration_accepts_iso8601() {
        for ok in ["P30D", "P1DT12H", "PT0.5S", "P1Y2M"] {
            let (_, errors) = validate_duration(&s(ok), "default_duration");
            assert!(errors.is_empty(), "{}", ok);
        }
        for bad in ["30 days", "P", "P1DT", "1D"] {
            let (_, errors) = validate_duration(&s(bad), "default_duration");
            assert_eq!(errors.len(), 1, "{}", bad);
        }
    }
}
