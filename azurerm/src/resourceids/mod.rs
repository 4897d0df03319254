//! ARM resource ID parsing and formatting
//!
//! Every resource type describes the shape of its ID as a static list of
//! [`Segment`]s. The [`Parser`] walks an input string against that grammar and
//! typed IDs declared with [`resource_id!`](crate::resource_id) bind the
//! captured values to struct fields.

mod error;
pub mod generic;
mod macros;
mod parser;
mod segment;

pub use error::ParseError;
pub use parser::{ParseResult, Parser};
pub use segment::{Segment, SegmentKind};

use tfplug::types::Dynamic;
use tfplug::TfplugError;

/// A typed ARM resource ID.
///
/// Implementations are generated by [`resource_id!`](crate::resource_id); the
/// provided methods cover formatting, parsing and validation.
pub trait ResourceId: Sized {
    /// Human readable resource type, e.g. "Automation Job Schedule"
    const DESCRIPTION: &'static str;

    fn segments() -> &'static [Segment];

    /// (segment key, label) for every captured segment
    fn labels() -> &'static [(&'static str, &'static str)];

    fn from_parse_result(result: &ParseResult) -> Result<Self, ParseError>;

    /// Captured value for the segment named `key`
    fn segment_value(&self, key: &str) -> Option<&str>;

    fn parser() -> Parser {
        Parser::new(Self::DESCRIPTION, Self::segments())
    }

    /// Canonical ARM form of this ID
    fn id(&self) -> String {
        let mut out = String::new();
        for segment in Self::segments() {
            let value = match segment.fixed_value() {
                Some(fixed) => fixed,
                None => self.segment_value(segment.name).unwrap_or_default(),
            };
            out.push('/');
            out.push_str(value.trim_start_matches('/'));
        }
        out
    }

    /// Parses a user supplied ID. Fixed segments must use canonical casing.
    fn parse(input: &str) -> Result<Self, ParseError> {
        let result = Self::parser().parse(input, false)?;
        Self::from_parse_result(&result)
    }

    /// Parses an ID returned by the API, tolerating any casing of the fixed
    /// segments. The result always carries canonical casing.
    fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        let result = Self::parser().parse(input, true)?;
        Self::from_parse_result(&result)
    }

    /// Validation callback for schema attributes holding this kind of ID
    fn validate(input: &Dynamic, key: &str) -> (Vec<String>, Vec<TfplugError>) {
        let value = match input.as_string() {
            Some(value) => value,
            None => {
                return (
                    vec![],
                    vec![TfplugError::TypeMismatch {
                        expected: format!("{} to be a string", key),
                        actual: input.type_name().to_string(),
                    }],
                )
            }
        };

        match Self::parse(value) {
            Ok(_) => (vec![], vec![]),
            Err(e) => (vec![], vec![TfplugError::ValidationFailed(e.to_string())]),
        }
    }

    /// Label used in error messages: leaf first, subscription omitted
    fn describe(&self) -> String {
        let parts: Vec<String> = Self::segments()
            .iter()
            .rev()
            .filter(|s| s.is_captured() && s.kind != SegmentKind::SubscriptionId)
            .filter_map(|s| {
                let label = Self::labels()
                    .iter()
                    .find(|(key, _)| *key == s.name)
                    .map(|(_, label)| *label)?;
                let value = self.segment_value(s.name)?;
                Some(format!("{} {:?}", label, value))
            })
            .collect();
        format!("{}: ({})", Self::DESCRIPTION, parts.join(" / "))
    }
}
