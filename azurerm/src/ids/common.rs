use crate::resourceids::Segment;

crate::resource_id! {
    pub struct SubscriptionId("Subscription") {
        subscription_id: "subscriptionId" => "Subscription",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
    ];
    validate = validate_subscription_id;
}

crate::resource_id! {
    pub struct ResourceGroupId("Resource Group") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
    ];
    validate = validate_resource_group_id;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resourceids::ResourceId;

    #[test]
    fn resource_group_id_round_trips() {
        let id = ResourceGroupId::new("sub1", "group1");
        assert_eq!(id.id(), "/subscriptions/sub1/resourceGroups/group1");
        assert_eq!(ResourceGroupId::parse(&id.id()).unwrap(), id);
        assert_eq!(id.to_string(), "Resource Group: (Resource Group Name \"group1\")");
    }

    #[test]
    fn subscription_id_rejects_resource_group_ids() {
        assert!(SubscriptionId::parse("/subscriptions/sub1").is_ok());
        assert!(SubscriptionId::parse("/subscriptions/sub1/resourceGroups/group1").is_err());
    }
}
