//! Typed accessors over untyped upgrade state

use crate::resourceids::ResourceId;
use tfplug::upgrade::RawStateMap;
use tfplug::TfplugError;

pub trait RawStateExt {
    /// String stored under `key`. None when absent, null or not a string.
    fn string(&self, key: &str) -> Option<&str>;

    /// Like [`RawStateExt::string`] but treats the empty string as absent
    fn non_empty_string(&self, key: &str) -> Option<&str> {
        self.string(key).filter(|s| !s.is_empty())
    }

    /// Moves the value under `from` to `to`. Returns false when `from` was absent.
    fn rename(&mut self, from: &str, to: &str) -> bool;

    fn set_string(&mut self, key: &str, value: impl Into<String>);

    /// String under `key`, or an upgrade error naming the missing key
    fn require_string(&self, key: &str) -> Result<&str, TfplugError> {
        self.non_empty_string(key).ok_or_else(|| {
            TfplugError::UpgradeFailed(format!("expected `{}` to be set in the stored state", key))
        })
    }
}

impl RawStateExt for RawStateMap {
    fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    fn rename(&mut self, from: &str, to: &str) -> bool {
        match self.remove(from) {
            Some(value) => {
                self.insert(to.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.insert(key.to_string(), serde_json::Value::String(value.into()));
    }
}

/// Rewrites the ID stored under `key` in canonical casing.
///
/// A missing or empty value is left alone; a value that does not parse as
/// `T` fails the upgrade.
pub fn normalize_id<T: ResourceId>(raw_state: &mut RawStateMap, key: &str) -> Result<(), TfplugError> {
    let old = match raw_state.non_empty_string(key) {
        Some(old) => old.to_string(),
        None => return Ok(()),
    };

    let parsed = T::parse_insensitively(&old)
        .map_err(|e| TfplugError::UpgradeFailed(format!("parsing `{}`: {}", key, e)))?;
    let normalized = parsed.id();

    if normalized != old {
        tracing::debug!(key, old = %old, new = %normalized, "Normalized resource ID casing");
    }
    raw_state.set_string(key, normalized);
    Ok(())
}
