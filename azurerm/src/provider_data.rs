//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AzureProviderData {
    pub client: Arc<Client>,
    /// Subscription resources are created in
    pub subscription_id: String,
}

impl AzureProviderData {
    pub fn new(client: Client, subscription_id: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            subscription_id: subscription_id.into(),
        }
    }
}
