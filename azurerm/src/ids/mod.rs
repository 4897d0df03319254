//! Typed IDs for the resource types this provider manages

pub mod automation;
pub mod common;
pub mod policy;
pub mod search;
pub mod sentinel;

pub use automation::{
    AutomationAccountId, AutomationJobScheduleId, AutomationRunbookId, AutomationScheduleId,
    JobScheduleId,
};
pub use common::{ResourceGroupId, SubscriptionId};
pub use policy::{PolicyAssignmentId, ResourceGroupPolicyRemediationId, ScopedPolicyRemediationId};
pub use search::{SearchServiceId, SharedPrivateLinkResourceId};
pub use sentinel::{AlertRuleTemplateId, AutomationRuleId, WatchlistId, WorkspaceId};
