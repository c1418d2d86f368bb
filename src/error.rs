// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::validation::ValidationError;

/// Generic body for every 500; the cause is logged, never returned.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 409 Conflict
    Conflict(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) | ApiError::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::ValidationError(msg)
            | ApiError::InvalidJson(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Stable code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "ok": false,
            "statusCode": self.status_code().as_u16(),
            "message": self.message(),
            "code": self.error_code(),
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn internal() -> Self {
        ApiError::InternalServerError(INTERNAL_MESSAGE.to_string())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::ExpiredOrInvalid => ApiError::unauthorized(err.to_string()),
            // Same body whichever credential check failed.
            AuthError::InvalidCredentials => ApiError::bad_request(err.to_string()),
            AuthError::Validation(e) => e.into(),
            AuthError::Storage(e) => e.into(),
            AuthError::TokenGeneration(_) | AuthError::Hash(_) => {
                tracing::error!("Auth failure: {}", err);
                ApiError::internal()
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::NotFound(msg),
            DatabaseError::Conflict(msg) => ApiError::Conflict(msg),
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal()
            }
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal()
            }
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("Request body too large".to_string());
        }
        ApiError::InvalidJson(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_status_and_code() {
        let body = ApiError::not_found("Hospital '1' not found").to_json();
        assert_eq!(body["ok"], false);
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["message"], "Hospital '1' not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[test]
    fn gate_failures_are_401_and_credential_failures_400() {
        assert_eq!(ApiError::from(AuthError::MissingToken).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::ExpiredOrInvalid).status_code(), StatusCode::UNAUTHORIZED);

        let creds = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(creds.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(creds.message(), "Invalid credentials");
    }

    #[test]
    fn validation_message_is_field_specific() {
        let err = ApiError::from(ValidationError::CidLength);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "cid must be exactly 13 digits (0-9)");
    }

    #[test]
    fn storage_details_are_not_echoed() {
        let err = ApiError::from(DatabaseError::QueryError("relation \"cm_users\" does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MESSAGE);

        let err = ApiError::from(AuthError::Storage(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)));
        assert_eq!(err.message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn conflict_and_not_found_keep_their_message() {
        assert_eq!(
            ApiError::from(DatabaseError::Conflict("dup".into())),
            ApiError::Conflict("dup".into())
        );
        assert_eq!(
            ApiError::from(DatabaseError::NotFound("gone".into())).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn method_and_size_errors_use_the_envelope() {
        let body = ApiError::method_not_allowed("Method DELETE not allowed on /cm-users/1").to_json();
        assert_eq!(body["statusCode"], 405);
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

        let err = ApiError::PayloadTooLarge("Request body too large".into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }
}
