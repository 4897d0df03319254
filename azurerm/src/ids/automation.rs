//! Automation account IDs
//!
//! `JobScheduleId` is the shape ARM uses for a job schedule, keyed by a GUID.
//! `AutomationJobScheduleId` is the ID stored in state since schema version 1,
//! addressing the job schedule through its runbook and schedule names.

use crate::resourceids::Segment;

crate::resource_id! {
    pub struct AutomationAccountId("Automation Account") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        automation_account_name: "automationAccountName" => "Automation Account Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAutomation", "Microsoft.Automation"),
        Segment::static_segment("staticAutomationAccounts", "automationAccounts"),
        Segment::user_specified("automationAccountName"),
    ];
    validate = validate_automation_account_id;
}

crate::resource_id! {
    pub struct AutomationRunbookId("Automation Runbook") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        automation_account_name: "automationAccountName" => "Automation Account Name",
        runbook_name: "runbookName" => "Runbook Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAutomation", "Microsoft.Automation"),
        Segment::static_segment("staticAutomationAccounts", "automationAccounts"),
        Segment::user_specified("automationAccountName"),
        Segment::static_segment("staticRunbooks", "runbooks"),
        Segment::user_specified("runbookName"),
    ];
    validate = validate_automation_runbook_id;
}

crate::resource_id! {
    pub struct AutomationScheduleId("Automation Schedule") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        automation_account_name: "automationAccountName" => "Automation Account Name",
        schedule_name: "scheduleName" => "Schedule Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAutomation", "Microsoft.Automation"),
        Segment::static_segment("staticAutomationAccounts", "automationAccounts"),
        Segment::user_specified("automationAccountName"),
        Segment::static_segment("staticSchedules", "schedules"),
        Segment::user_specified("scheduleName"),
    ];
    validate = validate_automation_schedule_id;
}

crate::resource_id! {
    pub struct JobScheduleId("Job Schedule") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        automation_account_name: "automationAccountName" => "Automation Account Name",
        job_schedule_id: "jobScheduleId" => "Job Schedule",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAutomation", "Microsoft.Automation"),
        Segment::static_segment("staticAutomationAccounts", "automationAccounts"),
        Segment::user_specified("automationAccountName"),
        Segment::static_segment("staticJobSchedules", "jobSchedules"),
        Segment::user_specified("jobScheduleId"),
    ];
    validate = validate_job_schedule_id;
}

crate::resource_id! {
    pub struct AutomationJobScheduleId("Automation Job Schedule") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group",
        automation_account_name: "automationAccountName" => "Automation Account Name",
        runbook_name: "runbookName" => "Runbook Name",
        schedule_name: "scheduleName" => "Schedule Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAutomation", "Microsoft.Automation"),
        Segment::static_segment("staticAutomationAccounts", "automationAccounts"),
        Segment::user_specified("automationAccountName"),
        Segment::static_segment("staticRunBook", "runBook"),
        Segment::user_specified("runbookName"),
        Segment::static_segment("staticSchedule", "schedule"),
        Segment::user_specified("scheduleName"),
    ];
    validate = validate_automation_job_schedule_id;
}

impl AutomationJobScheduleId {
    pub fn automation_account_id(&self) -> AutomationAccountId {
        AutomationAccountId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.automation_account_name,
        )
    }
}

impl JobScheduleId {
    pub fn automation_account_id(&self) -> AutomationAccountId {
        AutomationAccountId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.automation_account_name,
        )
    }
}
