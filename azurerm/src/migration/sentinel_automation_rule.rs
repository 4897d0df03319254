use super::state::RawStateExt;
use crate::provider_data::AzureProviderData;
use std::collections::HashMap;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::upgrade::{RawStateMap, StateUpgrade};
use tfplug::{Context, Result};

/// Renames `condition` to `condition_property`
pub struct SentinelAutomationRuleV0ToV1;

impl StateUpgrade<AzureProviderData> for SentinelAutomationRuleV0ToV1 {
    fn schema(&self) -> Schema {
        let mut condition = HashMap::new();
        condition.insert("property".to_string(), AttributeType::String);
        condition.insert("operator".to_string(), AttributeType::String);
        condition.insert(
            "values".to_string(),
            AttributeType::List(Box::new(AttributeType::String)),
        );

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
            .attribute(AttributeBuilder::new("order", AttributeType::Number).required().build())
            .attribute(AttributeBuilder::new("enabled", AttributeType::Bool).optional().build())
            .attribute(
                AttributeBuilder::new("expiration", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "condition",
                    AttributeType::List(Box::new(AttributeType::Object(condition))),
                )
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
        if raw_state.rename("condition", "condition_property") {
            tracing::debug!("Renamed `condition` to `condition_property`");
        }
        Ok(raw_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_state_upgrades_to_empty_state() {
        let upgraded = SentinelAutomationRuleV0ToV1
            .upgrade(&Context::new(), RawStateMap::new(), None)
            .unwrap();
        assert_eq!(upgraded, RawStateMap::new());
    }

    #[test]
    fn condition_becomes_condition_property() {
        let conditions = json!([
            {"property": "IncidentTitle", "operator": "Contains", "values": ["a", "b"]}
        ]);
        let mut raw = RawStateMap::new();
        raw.insert("condition".to_string(), conditions.clone());

        let upgraded = SentinelAutomationRuleV0ToV1
            .upgrade(&Context::new(), raw, None)
            .unwrap();

        let mut expected = RawStateMap::new();
        expected.insert("condition_property".to_string(), conditions);
        assert_eq!(upgraded, expected);
    }
}
