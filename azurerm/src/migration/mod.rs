//! State upgraders for resources whose schema version has been bumped
//!
//! Each upgrader converts directly from the version it is registered for to
//! the resource's current schema version.

mod automation_job_schedule;
mod sentinel_automation_rule;
mod sentinel_watchlist;
pub mod state;

pub use automation_job_schedule::AutomationJobScheduleV0ToV1;
pub use sentinel_automation_rule::SentinelAutomationRuleV0ToV1;
pub use sentinel_watchlist::SentinelWatchlistV0ToV1;
