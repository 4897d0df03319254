//! Attribute validators
//!
//! Stock string validators plus [`ValidateFuncValidator`], which lets a plain
//! validation function (for example a resource ID validator) act as a schema
//! [`Validator`].

use crate::error::TfplugError;
use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{AttributePath, Diagnostic, Dynamic};

/// Plain validation callback: takes the raw value and the attribute key and
/// returns warnings and errors. Must not panic on a value of the wrong type.
pub type ValidateFunc = fn(&Dynamic, &str) -> (Vec<String>, Vec<TfplugError>);

/// Adapts a [`ValidateFunc`] to the [`Validator`] trait
pub struct ValidateFuncValidator {
    func: ValidateFunc,
    description: String,
}

impl ValidateFuncValidator {
    pub fn new(func: ValidateFunc, description: impl Into<String>) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl Validator for ValidateFuncValidator {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let value = &request.config_value.value;
        if value.is_null() || value.is_unknown() {
            return ValidatorResponse {
                diagnostics: vec![],
            };
        }

        let key = request.path.to_string();
        let (warnings, errors) = (self.func)(value, &key);

        let mut diagnostics: Vec<Diagnostic> = warnings
            .into_iter()
            .map(|w| Diagnostic::warning(format!("Warning for {}", key), w))
            .collect();
        diagnostics.extend(errors.into_iter().map(|e| {
            Diagnostic::error(format!("Invalid value for {}", key), e.to_string())
                .with_attribute(request.path.clone())
        }));

        ValidatorResponse { diagnostics }
    }
}

fn string_value<'a>(
    request: &'a ValidatorRequest,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a String> {
    match &request.config_value.value {
        Dynamic::Null | Dynamic::Unknown => None,
        Dynamic::String(s) => Some(s),
        other => {
            diagnostics.push(type_mismatch(&request.path, other));
            None
        }
    }
}

fn type_mismatch(path: &AttributePath, value: &Dynamic) -> Diagnostic {
    Diagnostic::error(
        "Incorrect attribute value type",
        TfplugError::TypeMismatch {
            expected: "string".to_string(),
            actual: value.type_name().to_string(),
        }
        .to_string(),
    )
    .with_attribute(path.clone())
}

pub struct StringIsNotEmpty;

impl Validator for StringIsNotEmpty {
    fn description(&self) -> String {
        "string must not be empty".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = Vec::new();
        if let Some(s) = string_value(&request, &mut diagnostics) {
            if s.is_empty() {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must not be empty", request.path),
                        format!("expected \"{}\" to not be an empty string", request.path),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}

pub struct StringInSlice {
    pub values: Vec<String>,
    pub ignore_case: bool,
}

impl StringInSlice {
    pub fn new(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
            ignore_case: false,
        }
    }
}

impl Validator for StringInSlice {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.values.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = Vec::new();
        if let Some(s) = string_value(&request, &mut diagnostics) {
            let found = self.values.iter().any(|v| {
                if self.ignore_case {
                    v.eq_ignore_ascii_case(s)
                } else {
                    v == s
                }
            });
            if !found {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid value for {}", request.path),
                        format!(
                            "expected {} to be one of [{}], got {}",
                            request.path,
                            self.values.join(" "),
                            s
                        ),
                    )
                    .with_attribute(request.path.clone()),
                );
            }
        }
        ValidatorResponse { diagnostics }
    }
}
