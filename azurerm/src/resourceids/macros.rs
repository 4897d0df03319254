/// Declares a typed resource ID.
///
/// Each field is bound to the segment with the given key and carries the
/// label used by `Display`. The segment list is the full grammar, fixed and
/// captured segments alike, in path order.
///
/// Generates the struct, `new`, the [`ResourceId`](crate::resourceids::ResourceId)
/// impl, `Display` and a validation function usable as a schema
/// `ValidateFunc`.
#[macro_export]
macro_rules! resource_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($description:literal) {
            $( $field:ident : $key:literal => $label:literal ),+ $(,)?
        }
        segments = [ $( $segment:expr ),+ $(,)? ];
        validate = $validate:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            $( pub $field: String, )+
        }

        impl $name {
            #[allow(clippy::too_many_arguments)]
            pub fn new($( $field: impl Into<String> ),+) -> Self {
                Self {
                    $( $field: $field.into(), )+
                }
            }
        }

        impl $crate::resourceids::ResourceId for $name {
            const DESCRIPTION: &'static str = $description;

            fn segments() -> &'static [$crate::resourceids::Segment] {
                static SEGMENTS: &[$crate::resourceids::Segment] = &[ $( $segment ),+ ];
                SEGMENTS
            }

            fn labels() -> &'static [(&'static str, &'static str)] {
                &[ $( ($key, $label) ),+ ]
            }

            fn from_parse_result(
                result: &$crate::resourceids::ParseResult,
            ) -> ::std::result::Result<Self, $crate::resourceids::ParseError> {
                Ok(Self {
                    $( $field: result.get($key)?.to_string(), )+
                })
            }

            fn segment_value(&self, key: &str) -> Option<&str> {
                match key {
                    $( $key => Some(self.$field.as_str()), )+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&$crate::resourceids::ResourceId::describe(self))
            }
        }

        /// Checks that the value is a string holding a valid ID of this type
        $vis fn $validate(
            input: &::tfplug::types::Dynamic,
            key: &str,
        ) -> (Vec<String>, Vec<::tfplug::TfplugError>) {
            <$name as $crate::resourceids::ResourceId>::validate(input, key)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::resourceids::{ParseError, ResourceId, Segment};
    use tfplug::types::Dynamic;
    use tfplug::TfplugError;

    crate::resource_id! {
        /// Test-only ID nested two levels under a resource group
        pub struct WidgetId("Widget") {
            subscription_id: "subscriptionId" => "Subscription",
            resource_group_name: "resourceGroupName" => "Resource Group Name",
            factory_name: "factoryName" => "Factory Name",
            widget_name: "widgetName" => "Widget Name",
        }
        segments = [
            Segment::static_segment("staticSubscriptions", "subscriptions"),
            Segment::subscription_id("subscriptionId"),
            Segment::static_segment("staticResourceGroups", "resourceGroups"),
            Segment::resource_group("resourceGroupName"),
            Segment::static_segment("staticProviders", "providers"),
            Segment::resource_provider("staticContosoWidgets", "Contoso.Widgets"),
            Segment::static_segment("staticFactories", "factories"),
            Segment::user_specified("factoryName"),
            Segment::static_segment("staticWidgets", "widgets"),
            Segment::user_specified("widgetName"),
        ];
        validate = validate_widget_id;
    }

    fn widget() -> WidgetId {
        WidgetId::new("sub1", "group1", "factory1", "widget1")
    }

    #[test]
    fn id_formats_canonical_path() {
        assert_eq!(
            widget().id(),
            "/subscriptions/sub1/resourceGroups/group1/providers/Contoso.Widgets/factories/factory1/widgets/widget1"
        );
    }

    #[test]
    fn parse_inverts_id() {
        let id = widget();
        assert_eq!(WidgetId::parse(&id.id()).unwrap(), id);
    }

    #[test]
    fn display_lists_leaf_first_without_subscription() {
        assert_eq!(
            widget().to_string(),
            "Widget: (Widget Name \"widget1\" / Factory Name \"factory1\" / Resource Group Name \"group1\")"
        );
    }

    #[test]
    fn insensitive_parse_normalises_fixed_segments() {
        let input = "/subscriptions/sub1/resourcegroups/group1/providers/contoso.widgets/Factories/factory1/WIDGETS/widget1";
        assert!(matches!(
            WidgetId::parse(input),
            Err(ParseError::SegmentMismatch { .. })
        ));

        let id = WidgetId::parse_insensitively(input).unwrap();
        assert_eq!(id, widget());
        assert_eq!(id.id(), widget().id());
    }

    #[test]
    fn validate_reports_parse_errors_and_type_mismatches() {
        let (warnings, errors) = validate_widget_id(&Dynamic::String(widget().id()), "widget_id");
        assert!(warnings.is_empty());
        assert!(errors.is_empty());

        let (_, errors) = validate_widget_id(&Dynamic::String("/subscriptions/sub1".into()), "widget_id");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TfplugError::ValidationFailed(_)));

        let (_, errors) = validate_widget_id(&Dynamic::Number(3.0), "widget_id");
        assert!(matches!(
            errors[0],
            TfplugError::TypeMismatch { ref expected, .. } if expected == "widget_id to be a string"
        ));
    }
}
