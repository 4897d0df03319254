//! Envelope types shared by every ARM resource provider

use serde::{Deserialize, Serialize};

/// `{"error": {...}}` body returned on failed requests
#[derive(Debug, Deserialize)]
pub struct CloudError {
    pub error: CloudErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct CloudErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub target: Option<String>,
}

/// Proxy resource envelope: ID, name and type around a `properties` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmResource<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub properties: P,
}

impl<P> ArmResource<P> {
    /// Body for a PUT: server-populated fields are omitted
    pub fn new(properties: P) -> Self {
        Self {
            id: None,
            name: None,
            resource_type: None,
            etag: None,
            properties,
        }
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}

/// One page of a list call
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

/// Body of an `Azure-AsyncOperation` status URL
#[derive(Debug, Deserialize)]
pub struct OperationStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<CloudErrorBody>,
}

impl OperationStatus {
    pub fn is_succeeded(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case("Succeeded"))
    }

    pub fn is_failed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("Failed") || s.eq_ignore_ascii_case("Canceled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_status_terminal_states() {
        let done: OperationStatus = serde_json::from_str(r#"{"status":"Succeeded"}"#).unwrap();
        assert!(done.is_succeeded());

        let running: OperationStatus = serde_json::from_str(r#"{"status":"InProgress"}"#).unwrap();
        assert!(!running.is_succeeded());
        assert!(!running.is_failed());

        let failed: OperationStatus = serde_json::from_str(
            r#"{"status":"Failed","error":{"code":"Conflict","message":"busy"}}"#,
        )
        .unwrap();
        assert!(failed.is_failed());
        assert_eq!(failed.error.unwrap().to_string(), "Conflict: busy");

        let empty: OperationStatus = serde_json::from_str("{}").unwrap();
        assert!(empty.is_succeeded());
    }

    #[test]
    fn put_body_skips_server_fields() {
        let body = ArmResource::new(serde_json::json!({"displayName": "x"}));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"properties": {"displayName": "x"}})
        );
    }

    #[test]
    fn list_response_tolerates_missing_value() {
        let page: ListResponse<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }
}
