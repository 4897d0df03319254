use super::state::normalize_id;
use crate::ids::WatchlistId;
use crate::provider_data::AzureProviderData;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::upgrade::{RawStateMap, StateUpgrade};
use tfplug::{Context, Result};

/// Version 0 stored the watchlist ID as returned by the API, whose casing
/// varies. Version 1 stores it in canonical casing.
pub struct SentinelWatchlistV0ToV1;

impl StateUpgrade<AzureProviderData> for SentinelWatchlistV0ToV1 {
    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(AttributeBuilder::new("name", AttributeType::String).required().build())
            .attribute(
                AttributeBuilder::new("log_analytics_workspace_id", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("display_name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("item_search_key", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("labels", AttributeType::List(Box::new(AttributeType::String)))
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("default_duration", AttributeType::String)
                    .optional()
                    .build(),
            )
            .build()
    }

    fn upgrade(
        &self,
        _ctx: &Context,
        mut raw_state: RawStateMap,
        _meta: Option<&AzureProviderData>,
    ) -> Result<RawStateMap> {
        normalize_id::<WatchlistId>(&mut raw_state, "id")?;
        Ok(raw_state)
    }
}
