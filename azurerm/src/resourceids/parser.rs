//! Sequential scanner matching an ARM resource ID against a segment grammar

use super::error::ParseError;
use super::segment::{Segment, SegmentKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct Parser {
    description: &'static str,
    segments: &'static [Segment],
}

/// Values captured by a successful parse, keyed by segment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    description: &'static str,
    input: String,
    parsed: HashMap<&'static str, String>,
}

impl ParseResult {
    pub fn get(&self, key: &str) -> Result<&str, ParseError> {
        self.parsed
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ParseError::NotParsed {
                description: self.description.to_string(),
                input: self.input.clone(),
                key: key.to_string(),
            })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

impl Parser {
    pub const fn new(description: &'static str, segments: &'static [Segment]) -> Self {
        Self {
            description,
            segments,
        }
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    /// Example ID in canonical form, used in error messages and docs
    pub fn example_id(&self) -> String {
        let mut out = String::new();
        for segment in self.segments {
            out.push('/');
            out.push_str(segment.example_value().trim_start_matches('/'));
        }
        out
    }

    /// Parses `input` against the grammar.
    ///
    /// Insensitive mode compares fixed segments ignoring ASCII case and
    /// records the canonical literal; captured values are kept verbatim.
    pub fn parse(&self, input: &str, insensitively: bool) -> Result<ParseResult, ParseError> {
        let path = input.strip_prefix('/').unwrap_or(input);
        if path.is_empty() {
            return Err(ParseError::EmptyInput {
                description: self.description.to_string(),
                input: input.to_string(),
            });
        }

        let tokens: Vec<&str> = path.split('/').collect();
        let mut parsed = HashMap::with_capacity(self.segments.len());
        let mut position = 0;

        for (index, segment) in self.segments.iter().enumerate() {
            if segment.kind == SegmentKind::Scope {
                let following = self.segments.len() - index - 1;
                let end = tokens.len().saturating_sub(following);
                if end <= position || tokens[position..end].iter().any(|t| t.is_empty()) {
                    return Err(self.missing_value(input, segment));
                }
                parsed.insert(segment.name, format!("/{}", tokens[position..end].join("/")));
                position = end;
                continue;
            }

            let token = match tokens.get(position) {
                Some(token) => *token,
                None => return Err(self.missing_segment(input, segment)),
            };

            match segment.fixed_value() {
                Some(expected) => {
                    if token.is_empty() {
                        return Err(self.missing_segment(input, segment));
                    }
                    let matches = if insensitively {
                        token.eq_ignore_ascii_case(expected)
                    } else {
                        token == expected
                    };
                    if !matches {
                        return Err(ParseError::SegmentMismatch {
                            description: self.description.to_string(),
                            input: input.to_string(),
                            position,
                            expected: expected.to_string(),
                            actual: token.to_string(),
                        });
                    }
                    parsed.insert(segment.name, expected.to_string());
                }
                None => {
                    if token.is_empty() {
                        return Err(self.missing_value(input, segment));
                    }
                    parsed.insert(segment.name, token.to_string());
                }
            }
            position += 1;
        }

        if position < tokens.len() {
            return Err(ParseError::ExtraSegments {
                description: self.description.to_string(),
                input: input.to_string(),
                extra: tokens[position..].join("/"),
            });
        }

        tracing::trace!(
            description = self.description,
            input,
            insensitively,
            "Parsed resource ID"
        );

        Ok(ParseResult {
            description: self.description,
            input: input.to_string(),
            parsed,
        })
    }

    fn missing_segment(&self, input: &str, segment: &Segment) -> ParseError {
        ParseError::MissingSegment {
            description: self.description.to_string(),
            input: input.to_string(),
            segment: segment.display_name().to_string(),
        }
    }

    fn missing_value(&self, input: &str, segment: &Segment) -> ParseError {
        ParseError::MissingValue {
            description: self.description.to_string(),
            input: input.to_string(),
            key: segment.name.to_string(),
        }
    }
}
