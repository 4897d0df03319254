//! Parsing of arbitrary ARM resource IDs
//!
//! Used where an argument may reference any Azure resource, for example the
//! target of a private link. Only the overall `key/value` shape is checked.

use super::error::ParseError;
use tfplug::types::Dynamic;
use tfplug::TfplugError;

const DESCRIPTION: &str = "Resource ID";

/// Components of an arbitrary ARM resource ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmResourceId {
    pub subscription_id: String,
    pub resource_group: Option<String>,
    /// First provider namespace in the path, e.g. `Microsoft.Search`
    pub provider: Option<String>,
    /// Remaining `key/value` pairs in path order
    pub path: Vec<(String, String)>,
}

impl ArmResourceId {
    /// First value stored under `key` in the path
    pub fn path_value(&self, key: &str) -> Option<&str> {
        self.path
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Name of the resource the ID points at
    pub fn name(&self) -> Option<&str> {
        self.path.last().map(|(_, v)| v.as_str())
    }
}

/// Splits any ARM ID into its components.
///
/// The path must consist of non-empty `key/value` pairs and name a
/// subscription. `resourceGroups` is also recognised in lower case.
pub fn parse_resource_id(input: &str) -> Result<ArmResourceId, ParseError> {
    let path = input.trim_start_matches('/').trim_end_matches('/');
    if path.is_empty() {
        return Err(ParseError::EmptyInput {
            description: DESCRIPTION.to_string(),
            input: input.to_string(),
        });
    }

    let components: Vec<&str> = path.split('/').collect();
    if components.len() % 2 != 0 {
        return Err(ParseError::MissingValue {
            description: DESCRIPTION.to_string(),
            input: input.to_string(),
            key: components[components.len() - 1].to_string(),
        });
    }

    let mut subscription_id = None;
    let mut resource_group = None;
    let mut provider = None;
    let mut pairs = Vec::with_capacity(components.len() / 2);

    for pair in components.chunks(2) {
        let (key, value) = (pair[0], pair[1]);
        if key.is_empty() || value.is_empty() {
            return Err(ParseError::MissingValue {
                description: DESCRIPTION.to_string(),
                input: input.to_string(),
                key: key.to_string(),
            });
        }

        match key {
            "subscriptions" if subscription_id.is_none() => {
                subscription_id = Some(value.to_string())
            }
            "resourceGroups" | "resourcegroups" if resource_group.is_none() => {
                resource_group = Some(value.to_string())
            }
            "providers" if provider.is_none() => provider = Some(value.to_string()),
            _ => pairs.push((key.to_string(), value.to_string())),
        }
    }

    let subscription_id = subscription_id.ok_or_else(|| ParseError::MissingSegment {
        description: DESCRIPTION.to_string(),
        input: input.to_string(),
        segment: "subscriptions".to_string(),
    })?;

    Ok(ArmResourceId {
        subscription_id,
        resource_group,
        provider,
        path: pairs,
    })
}

/// Validation callback for arguments accepting any ARM resource ID
pub fn validate_resource_id(input: &Dynamic, key: &str) -> (Vec<String>, Vec<TfplugError>) {
    let value = match input.as_string() {
        Some(value) => value,
        None => {
            return (
                vec![],
                vec![TfplugError::TypeMismatch {
                    expected: format!("{} to be a string", key),
                    actual: input.type_name().to_string(),
                }],
            )
        }
    };

    match parse_resource_id(value) {
        Ok(_) => (vec![], vec![]),
        Err(e) => (
            vec![],
            vec![TfplugError::ValidationFailed(format!(
                "Can not parse {:?} as a resource id: {}",
                key, e
            ))],
        ),
    }
}

/// Like [`validate_resource_id`] but also accepts an empty string
pub fn validate_resource_id_or_empty(
    input: &Dynamic,
    key: &str,
) -> (Vec<String>, Vec<TfplugError>) {
    if input.as_string().is_some_and(|s| s.is_empty()) {
        return (vec![], vec![]);
    }
    validate_resource_id(input, key)
}
