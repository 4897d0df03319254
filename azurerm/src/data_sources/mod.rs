//! Data source implementations

pub mod sentinel_alert_rule_template;

pub use sentinel_alert_rule_template::SentinelAlertRuleTemplateDataSource;
