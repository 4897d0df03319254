//! Process-wide named locks
//!
//! Serialises operations that touch the same ARM resource, e.g. two shared
//! private link resources added to one search service. Locks have no timeout;
//! the operation's own context bounds how long the holder keeps them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tokio::sync::OwnedMutexGuard;

type LockMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

fn locks() -> &'static LockMap {
    static LOCKS: OnceLock<LockMap> = OnceLock::new();
    LOCKS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Held lock. Released when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LockGuard {
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl LockGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        tracing::debug!(key = %self.key, "Released lock");
    }
}

fn mutex_for(key: &str) -> Arc<tokio::sync::Mutex<()>> {
    let mut map = locks().lock().unwrap_or_else(|e| e.into_inner());
    map.entry(key.to_string())
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

/// Locks the given resource ID until the guard is dropped
pub async fn by_id(id: &str) -> LockGuard {
    let mutex = mutex_for(id);
    tracing::debug!(key = id, "Waiting for lock");
    let guard = mutex.lock_owned().await;
    tracing::debug!(key = id, "Acquired lock");
    LockGuard {
        key: id.to_string(),
        _guard: guard,
    }
}

/// Locks `name` within `resource_type`, e.g. a virtual network by name
pub async fn by_name(name: &str, resource_type: &str) -> LockGuard {
    by_id(&format!("{}.{}", resource_type, name)).await
}
