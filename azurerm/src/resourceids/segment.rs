//! Segment descriptors making up a resource ID grammar

/// What a segment of a resource ID holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fixed path component, e.g. `resourceGroups` or `automationAccounts`
    Static(&'static str),
    /// Fixed resource provider namespace, e.g. `Microsoft.Automation`
    ResourceProvider(&'static str),
    SubscriptionId,
    ResourceGroup,
    /// Name chosen by the user, e.g. an account or schedule name
    UserSpecified,
    /// Arbitrary ARM scope the resource is nested under, e.g. a subscription
    /// or a resource group. Spans one or more path components.
    Scope,
}

/// One named segment of a resource ID grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub kind: SegmentKind,
}

impl Segment {
    pub const fn static_segment(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Static(value),
        }
    }

    pub const fn resource_provider(name: &'static str, namespace: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceProvider(namespace),
        }
    }

    pub const fn subscription_id(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::SubscriptionId,
        }
    }

    pub const fn resource_group(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceGroup,
        }
    }

    pub const fn user_specified(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::UserSpecified,
        }
    }

    pub const fn scope(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Scope,
        }
    }

    /// The literal for static and provider segments, None for captured ones
    pub fn fixed_value(&self) -> Option<&'static str> {
        match self.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.fixed_value().is_none()
    }

    /// Value used when rendering an example ID for this segment
    pub fn example_value(&self) -> String {
        match self.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => value.to_string(),
            SegmentKind::SubscriptionId => "12345678-1234-9876-4563-123456789012".to_string(),
            SegmentKind::ResourceGroup => "example-resource-group".to_string(),
            SegmentKind::UserSpecified => format!("{}Value", self.name),
            SegmentKind::Scope => {
                "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/some-resource-group"
                    .to_string()
            }
        }
    }

    /// How a missing segment is named in errors: the literal for fixed
    /// segments, the key for captured ones
    pub fn display_name(&self) -> &'static str {
        self.fixed_value().unwrap_or(self.name)
    }
}
