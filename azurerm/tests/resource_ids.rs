use azurerm::ids::{
    AlertRuleTemplateId, AutomationAccountId, AutomationJobScheduleId, AutomationRuleId,
    JobScheduleId, PolicyAssignmentId, ResourceGroupId, ResourceGroupPolicyRemediationId,
    ScopedPolicyRemediationId, SearchServiceId, SharedPrivateLinkResourceId, SubscriptionId,
    WatchlistId, WorkspaceId,
};
use azurerm::resourceids::{ParseError, ResourceId};
use std::fmt::Debug;

const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";
const JOB_SCHEDULE: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1/runBook/book1/schedule/schedule1";

fn assert_round_trip<T: ResourceId + PartialEq + Debug>(id: T) {
    let formatted = id.id();
    assert_eq!(T::parse(&formatted).unwrap(), id, "parse {}", formatted);
    assert_eq!(
        T::parse_insensitively(&formatted).unwrap(),
        id,
        "parse_insensitively {}",
        formatted
    );
}

#[test]
fn automation_job_schedule_id_matches_arm_format() {
    let id = AutomationJobScheduleId::new(SUBSCRIPTION, "group1", "account1", "book1", "schedule1");
    assert_eq!(id.id(), JOB_SCHEDULE);

    let parsed = AutomationJobScheduleId::parse(JOB_SCHEDULE).unwrap();
    assert_eq!(parsed.subscription_id, SUBSCRIPTION);
    assert_eq!(parsed.resource_group_name, "group1");
    assert_eq!(parsed.automation_account_name, "account1");
    assert_eq!(parsed.runbook_name, "book1");
    assert_eq!(parsed.schedule_name, "schedule1");
}

#[test]
fn every_id_type_round_trips() {
    assert_round_trip(SubscriptionId::new(SUBSCRIPTION));
    assert_round_trip(ResourceGroupId::new(SUBSCRIPTION, "group1"));
    assert_round_trip(AutomationAccountId::new(SUBSCRIPTION, "group1", "account1"));
    assert_round_trip(JobScheduleId::new(
        SUBSCRIPTION,
        "group1",
        "account1",
        "0fa462ba-3aa2-4138-83ca-9ebc3bc55cdc",
    ));
    assert_round_trip(AutomationJobScheduleId::new(
        SUBSCRIPTION,
        "group1",
        "account1",
        "book1",
        "schedule1",
    ));
    assert_round_trip(SearchServiceId::new(SUBSCRIPTION, "group1", "search1"));
    assert_round_trip(SharedPrivateLinkResourceId::new(
        SUBSCRIPTION,
        "group1",
        "search1",
        "link1",
    ));
    assert_round_trip(WorkspaceId::new(SUBSCRIPTION, "group1", "workspace1"));
    assert_round_trip(WatchlistId::new(SUBSCRIPTION, "group1", "workspace1", "list1"));
    assert_round_trip(AutomationRuleId::new(
        SUBSCRIPTION,
        "group1",
        "workspace1",
        "0fa462ba-3aa2-4138-83ca-9ebc3bc55cdc",
    ));
    assert_round_trip(AlertRuleTemplateId::new(
        SUBSCRIPTION,
        "group1",
        "workspace1",
        "65360bb0-8986-4ade-a89d-af3cf44d28aa",
    ));
    assert_round_trip(ResourceGroupPolicyRemediationId::new(
        SUBSCRIPTION,
        "group1",
        "fix1",
    ));
    assert_round_trip(PolicyAssignmentId::new(
        format!("/subscriptions/{}/resourceGroups/group1", SUBSCRIPTION),
        "assign1",
    ));
    assert_round_trip(ScopedPolicyRemediationId::new(
        "/providers/Microsoft.Management/managementGroups/mg1",
        "fix1",
    ));
}

#[test]
fn parse_is_case_sensitive_for_fixed_segments() {
    let variants = [
        JOB_SCHEDULE.replace("/subscriptions/", "/SUBSCRIPTIONS/"),
        JOB_SCHEDULE.replace("/resourceGroups/", "/resourcegroups/"),
        JOB_SCHEDULE.replace("Microsoft.Automation", "microsoft.automation"),
        JOB_SCHEDULE.replace("/automationAccounts/", "/AutomationAccounts/"),
        JOB_SCHEDULE.replace("/runBook/", "/runbook/"),
        JOB_SCHEDULE.replace("/schedule/", "/Schedule/"),
    ];

    let canonical = AutomationJobScheduleId::parse(JOB_SCHEDULE).unwrap();
    for input in &variants {
        assert!(
            matches!(
                AutomationJobScheduleId::parse(input),
                Err(ParseError::SegmentMismatch { .. })
            ),
            "{} should be rejected",
            input
        );

        let parsed = AutomationJobScheduleId::parse_insensitively(input).unwrap();
        assert_eq!(parsed, canonical);
        assert_eq!(parsed.id(), JOB_SCHEDULE);
    }
}

#[test]
fn insensitive_parse_keeps_captured_values_verbatim() {
    let input = JOB_SCHEDULE
        .replace("/automationAccounts/account1", "/AUTOMATIONACCOUNTS/Account1");
    let parsed = AutomationJobScheduleId::parse_insensitively(&input).unwrap();
    assert_eq!(parsed.automation_account_name, "Account1");
}

#[test]
fn truncated_ids_name_the_missing_segment() {
    let cases = [
        ("/subscriptions", "subscriptionId"),
        ("/subscriptions/sub1", "resourceGroups"),
        ("/subscriptions/sub1/resourceGroups", "resourceGroupName"),
        ("/subscriptions/sub1/resourceGroups/group1", "providers"),
        (
            "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts",
            "automationAccountName",
        ),
        (
            "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1/runBook/book1",
            "schedule",
        ),
        (
            "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Automation/automationAccounts/account1/runBook/book1/schedule",
            "scheduleName",
        ),
    ];

    for (input, segment) in cases {
        let err = AutomationJobScheduleId::parse(input).unwrap_err();
        assert!(
            matches!(err, ParseError::MissingSegment { .. }),
            "{}: {:?}",
            input,
            err
        );
        assert_eq!(err.segment(), Some(segment), "{}", input);
        assert!(err.to_string().contains(segment));
    }
}

#[test]
fn empty_values_and_extra_segments_are_rejected() {
    let empty_account = JOB_SCHEDULE.replace("/account1/", "//");
    assert!(matches!(
        AutomationJobScheduleId::parse(&empty_account),
        Err(ParseError::MissingValue { ref key, .. }) if key == "automationAccountName"
    ));

    let extra = format!("{}/jobs/job1", JOB_SCHEDULE);
    assert!(matches!(
        AutomationJobScheduleId::parse(&extra),
        Err(ParseError::ExtraSegments { ref extra, .. }) if extra == "jobs/job1"
    ));

    assert!(matches!(
        AutomationJobScheduleId::parse(""),
        Err(ParseError::EmptyInput { .. })
    ));
}

#[test]
fn display_describes_ids_for_error_messages() {
    let id = AutomationJobScheduleId::parse(JOB_SCHEDULE).unwrap();
    let text = id.to_string();
    assert!(text.starts_with("Automation Job Schedule: ("));
    assert!(text.contains("Schedule Name \"schedule1\""));
    assert!(!text.contains(SUBSCRIPTION));
}

#[test]
fn scoped_ids_absorb_any_scope() {
    let input = format!(
        "/subscriptions/{}/resourceGroups/group1/providers/Microsoft.Authorization/policyAssignments/assign1",
        SUBSCRIPTION
    );
    let id = PolicyAssignmentId::parse(&input).unwrap();
    assert_eq!(
        id.scope,
        format!("/subscriptions/{}/resourceGroups/group1", SUBSCRIPTION)
    );
    assert_eq!(id.policy_assignment_name, "assign1");
    assert_eq!(id.id(), input);
}
