//! Policy IDs
//!
//! Policy assignments and remediations can live at any ARM scope, so their
//! grammars open with a scope segment.

use crate::resourceids::Segment;

crate::resource_id! {
    pub struct PolicyAssignmentId("Policy Assignment") {
        scope: "scope" => "Scope",
        policy_assignment_name: "policyAssignmentName" => "Policy Assignment Name",
    }
    segments = [
        Segment::scope("scope"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftAuthorization", "Microsoft.Authorization"),
        Segment::static_segment("staticPolicyAssignments", "policyAssignments"),
        Segment::user_specified("policyAssignmentName"),
    ];
    validate = validate_policy_assignment_id;
}

crate::resource_id! {
    pub struct ScopedPolicyRemediationId("Scoped Policy Remediation") {
        scope: "scope" => "Scope",
        remediation_name: "remediationName" => "Remediation Name",
    }
    segments = [
        Segment::scope("scope"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftPolicyInsights", "Microsoft.PolicyInsights"),
        Segment::static_segment("staticRemediations", "remediations"),
        Segment::user_specified("remediationName"),
    ];
    validate = validate_scoped_policy_remediation_id;
}

crate::resource_id! {
    pub struct ResourceGroupPolicyRemediationId("Resource Group Policy Remediation") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        remediation_name: "remediationName" => "Remediation Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftPolicyInsights", "Microsoft.PolicyInsights"),
        Segment::static_segment("staticRemediations", "remediations"),
        Segment::user_specified("remediationName"),
    ];
    validate = validate_resource_group_policy_remediation_id;
}

impl ResourceGroupPolicyRemediationId {
    pub fn resource_group_id(&self) -> super::ResourceGroupId {
        super::ResourceGroupId::new(&self.subscription_id, &self.resource_group_name)
    }
}
