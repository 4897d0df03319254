use crate::resourceids::Segment;

crate::resource_id! {
    pub struct SearchServiceId("Search Service") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        search_service_name: "searchServiceName" => "Search Service Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSearch", "Microsoft.Search"),
        Segment::static_segment("staticSearchServices", "searchServices"),
        Segment::user_specified("searchServiceName"),
    ];
    validate = validate_search_service_id;
}

crate::resource_id! {
    pub struct SharedPrivateLinkResourceId("Shared Private Link Resource") {
        subscription_id: "subscriptionId" => "Subscription",
        resource_group_name: "resourceGroupName" => "Resource Group Name",
        search_service_name: "searchServiceName" => "Search Service Name",
        shared_private_link_resource_name: "sharedPrivateLinkResourceName" => "Shared Private Link Resource Name",
    }
    segments = [
        Segment::static_segment("staticSubscriptions", "subscriptions"),
        Segment::subscription_id("subscriptionId"),
        Segment::static_segment("staticResourceGroups", "resourceGroups"),
        Segment::resource_group("resourceGroupName"),
        Segment::static_segment("staticProviders", "providers"),
        Segment::resource_provider("staticMicrosoftSearch", "Microsoft.Search"),
        Segment::static_segment("staticSearchServices", "searchServices"),
        Segment::user_specified("searchServiceName"),
        Segment::static_segment("staticSharedPrivateLinkResources", "sharedPrivateLinkResources"),
        Segment::user_specified("sharedPrivateLinkResourceName"),
    ];
    validate = validate_shared_private_link_resource_id;
}

impl SharedPrivateLinkResourceId {
    pub fn search_service_id(&self) -> SearchServiceId {
        SearchServiceId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.search_service_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resourceids::ResourceId;

    #[test]
    fn shared_private_link_resource_points_at_its_service() {
        let id = SharedPrivateLinkResourceId::new("sub1", "group1", "search1", "link1");
        let parsed = SharedPrivateLinkResourceId::parse(&id.id()).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(
            parsed.search_service_id().id(),
            "/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Search/searchServices/search1"
        );
    }
}
