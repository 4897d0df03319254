//! Sentinel IDs
//!
//! Sentinel objects are extension resources of a Log Analytics workspace, so
//! their IDs nest a second `providers` segment under the workspace.

use crate::resourceids::Segment;

crate::resource_id! {
    pub struct WorkspaceId("Log Analytics Workspace") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        workspace_name: "workspaceName" => "Workspace Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftOperationalInsights", "Microsoft.OperationalInsights"),
        Segment::static_segment("staticWorkspaces", "workspaces"),
        Segment::user_specified("workspaceName"),
    ];
    validate = validate_workspace_id;
}

crate::resource_id! {
    pub struct WatchlistId("Sentinel Watchlist") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        workspace_name: "workspaceName" => "Workspace Name",
        watchlist_name: "watchlistName" => "Watchlist Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftOperationalInsights", "Microsoft.OperationalInsights"),
        Segment::static_segment("staticWorkspaces", "workspaces"),
        Segment::user_specified("workspaceName"),
        Segment::static_segment("staticProviders2", "providers"),
        Segment::resource_provider("staticMicrosoftSecurityInsights", "Microsoft.SecurityInsights"),
        Segment::static_segment("staticWatchlists", "watchlists"),
        Segment::user_specified("watchlistName"),
    ];
    validate = validate_watchlist_id;
}

crate::resource_id! {
    pub struct AutomationRuleId("Sentinel Automation Rule") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        workspace_name: "workspaceName" => "Workspace Name",
        automation_rule_id: "automationRuleId" => "Automation Rule",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftOperationalInsights", "Microsoft.OperationalInsights"),
        Segment::static_segment("staticWorkspaces", "workspaces"),
        Segment::user_specified("workspaceName"),
        Segment::static_segment("staticProviders2", "providers"),
        Segment::resource_provider("staticMicrosoftSecurityInsights", "Microsoft.SecurityInsights"),
        Segment::static_segment("staticAutomationRules", "automationRules"),
        Segment::user_specified("automationRuleId"),
    ];
    validate = validate_automation_rule_id;
}

crate::resource_id! {
    pub struct AlertRuleTemplateId("Sentinel Alert Rule Template") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        workspace_name: "workspaceName" => "Workspace Name",
        alert_rule_template_id: "alertRuleTemplateId" => "Alert Rule Template",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftOperationalInsights", "Microsoft.OperationalInsights"),
        Segment::static_segment("staticWorkspaces", "workspaces"),
        Segment::user_specified("workspaceName"),
        Segment::static_segment("staticProviders2", "providers"),
        Segment::resource_provider("staticMicrosoftSecurityInsights", "Microsoft.SecurityInsights"),
        Segment::static_segment("staticAlertRuleTemplates", "alertRuleTemplates"),
        Segment::user_specified("alertRuleTemplateId"),
    ];
    validate = validate_alert_rule_template_id;
}

macro_rules! workspace_accessor {
    ($($name:ident),+) => {
        $(
            impl $name {
                pub fn workspace_id(&self) -> WorkspaceId {
                    WorkspaceId::new(
                        &self.subscription_id,
                        &self.resource_group_name,
                        &self.workspace_name,
                    )
                }
            }
        )+
    };
}

workspace_accessor!(WatchlistId, AutomationRuleId, AlertRuleTemplateId);
