//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating
//! [`Error`](crate::domain::Error) into Actix responses here. The envelope
//! captures the ambient trace identifier so clients can quote it back when
//! reporting a failure.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ports::{PasswordHashError, PersistenceError};
use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

/// Standard error envelope returned by HTTP handlers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "missing required field: comment")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any ambient
    /// trace identifier.
    pub fn from_domain(error: Error) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: error.details().cloned(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier propagated into the response header.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for clients.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            // Uniqueness conflicts share 400 with validation failures; the
            // `code` field discriminates the two categories.
            ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self::from_domain(value)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        Self::from_domain(value.into())
    }
}

impl From<PasswordHashError> for ApiError {
    fn from(value: PasswordHashError) -> Self {
        Self::from_domain(value.into())
    }
}

impl From<actix_web::Error> for ApiError {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to API error");
        Self::from_domain(Error::internal("Internal server error"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        if matches!(self.code, ErrorCode::InternalError) {
            error!(message = %self.message, "internal error returned to client");
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_owned();
            redacted.details = None;
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::conflict("dup"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("who"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("nope"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_codes_discriminate_categories(#[case] err: Error, #[case] expected: StatusCode) {
        let api_err = ApiError::from_domain(err);
        assert_eq!(api_err.status_code(), expected);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let api_err = ApiError::from_domain(Error::internal("connection string leaked"));
        let response = api_err.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(value["message"], "Internal server error");
        assert_eq!(value["code"], "internal_error");
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let api_err = ApiError::from_domain(Error::not_found("feedback entry not found"));
        let response = api_err.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(value["message"], "feedback entry not found");
    }
}
