//! Shared validation helpers for inbound HTTP adapters.

use actix_web::error::JsonPayloadError;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, FieldError, LoginValidationError, ValidationErrors};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidLimit,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidLimit => "invalid_limit",
            ErrorCode::InvalidBody => "invalid_body",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must contain valid UUIDs")).with_index(
        ErrorCode::InvalidUuid,
        index,
        value,
    )
}

pub(crate) fn parse_optional_uuid(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    value.map(|raw| parse_uuid(raw, field)).transpose()
}

/// Parse a `limit` query parameter, falling back to `default` when absent.
///
/// Only the integer syntax is checked here; range rules belong to the domain.
pub(crate) fn parse_limit(value: Option<&str>, default: i64) -> Result<i64, Error> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
            ValidationError::new("limit", "limit must be a positive integer")
                .with_value(ErrorCode::InvalidLimit, raw)
        }),
    }
}

fn invalid_body(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request("request body is not valid JSON for this endpoint").with_details(
        json!({
            "code": ErrorCode::InvalidBody.as_str(),
            "reason": reason.to_string(),
        }),
    )
}

/// Decode a JSON request body taken as raw bytes.
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(invalid_body)
}

/// `JsonConfig` error handler rendering extractor failures as `invalid_request`.
pub(crate) fn json_payload_error(
    error: JsonPayloadError,
    _request: &actix_web::HttpRequest,
) -> actix_web::Error {
    invalid_body(error).into()
}

/// Report every collected field failure in a single `invalid_request`.
pub(crate) fn field_errors(message: &str, errors: &ValidationErrors) -> Error {
    Error::invalid_request(message).with_details(json!({ "fields": errors }))
}

pub(crate) fn login_errors(errors: Vec<LoginValidationError>) -> Error {
    let fields: ValidationErrors = errors
        .iter()
        .map(|error| FieldError::new(error.field(), error.to_string()))
        .collect::<Vec<_>>()
        .into();
    field_errors("invalid login request", &fields)
}
