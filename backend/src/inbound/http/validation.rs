//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise into all-optional DTOs so missing or malformed
//! fields surface as field-annotated envelope errors instead of opaque
//! deserialisation failures.

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_field_error(field: FieldName, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

/// Require a present, non-blank string field.
pub(crate) fn require_text(value: Option<&str>, field: FieldName) -> Result<&str, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}
