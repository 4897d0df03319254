/// Errors produced while parsing a resource ID against a grammar.
/// Every variant names the ID being parsed and the resource type it was
/// parsed as.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("parsing {input:?} as {description}: ID was empty")]
    EmptyInput { description: String, input: String },

    #[error("parsing {input:?} as {description}: ID was missing the `{segment}` element")]
    MissingSegment {
        description: String,
        input: String,
        segment: String,
    },

    #[error("parsing {input:?} as {description}: missing value for `{key}`")]
    MissingValue {
        description: String,
        input: String,
        key: String,
    },

    #[error(
        "parsing {input:?} as {description}: expected the segment at position {position} to be {expected:?} but got {actual:?}"
    )]
    SegmentMismatch {
        description: String,
        input: String,
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("parsing {input:?} as {description}: ID contained extra segments {extra:?}")]
    ExtraSegments {
        description: String,
        input: String,
        extra: String,
    },

    #[error("parsing {input:?} as {description}: the segment `{key}` was not parsed")]
    NotParsed {
        description: String,
        input: String,
        key: String,
    },
}

impl ParseError {
    /// The segment key or literal the error is about, if any
    pub fn segment(&self) -> Option<&str> {
        match self {
            ParseError::MissingSegment { segment, .. } => Some(segment),
            ParseError::MissingValue { key, .. } | ParseError::NotParsed { key, .. } => Some(key),
            ParseError::SegmentMismatch { expected, .. } => Some(expected),
            ParseError::EmptyInput { .. } | ParseError::ExtraSegments { .. } => None,
        }
    }

    pub fn input(&self) -> &str {
        match self {
            ParseError::EmptyInput { input, .. }
            | ParseError::MissingSegment { input, .. }
            | ParseError::MissingValue { input, .. }
            | ParseError::SegmentMismatch { input, .. }
            | ParseError::ExtraSegments { input, .. }
            | ParseError::NotParsed { input, .. } => input,
        }
    }
}
