//! Thin Azure Resource Manager REST client
//!
//! `Client` handles transport concerns; the service modules only know paths,
//! API versions and body shapes.

pub mod automation;
pub mod client;
pub mod common;
pub mod error;
pub mod policy_insights;
pub mod search;
pub mod security_insights;

pub use client::{Client, RetryConfig, DEFAULT_ENDPOINT};
pub use common::ArmResource;
pub use error::ApiError;

#[cfg(test)]
pub(crate) fn create_test_client(url: &str) -> Client {
    Client::with_config(
        url,
        "test-token",
        RetryConfig {
            max_retries: 0,
            initial_backoff_ms: 1,
            max_backoff_ms: 1,
            timeout_seconds: 5,
            poll_interval_ms: 1,
        },
    )
    .unwrap()
}
