//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error type
///
/// Every variant is terminal to the request it occurs in: it is surfaced to
/// the caller with a stable error tag and never silently retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Request validation
    #[error("Missing or invalid field: {0}")]
    MissingField(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),

    // Authentication
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid 2FA code")]
    InvalidOtp,

    // Session tokens
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Token signature verification failed")]
    InvalidSignature,
    #[error("Malformed token")]
    MalformedToken,
    #[error("Authentication required")]
    Unauthorized,

    // Resources
    #[error("Resource not found")]
    NotFound,

    // Internal
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::MissingField(msg) => (StatusCode::BAD_REQUEST, "MISSING_FIELD", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            ApiError::DuplicateUsername => {
                (StatusCode::CONFLICT, "DUPLICATE_USERNAME", self.to_string())
            }
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND", self.to_string()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            ApiError::InvalidOtp => (StatusCode::UNAUTHORIZED, "INVALID_OTP", self.to_string()),

            ApiError::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, "EXPIRED_TOKEN", self.to_string())
            }
            ApiError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SIGNATURE",
                self.to_string(),
            ),
            ApiError::MalformedToken => (
                StatusCode::UNAUTHORIZED,
                "MALFORMED_TOKEN",
                self.to_string(),
            ),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),

            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),

            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database error".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    // PostgreSQL unique violation; the only unique constraint
                    // in the schema is accounts.username
                    if code == "23505" {
                        return ApiError::DuplicateUsername;
                    }
                }
                ApiError::Database(db_err.to_string())
            }
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<crate::auth::token::TokenError> for ApiError {
    fn from(err: crate::auth::token::TokenError) -> Self {
        use crate::auth::token::TokenError;
        match err {
            TokenError::Expired => ApiError::ExpiredToken,
            TokenError::InvalidSignature => ApiError::InvalidSignature,
            TokenError::Malformed => ApiError::MalformedToken,
            TokenError::Encoding(e) => {
                tracing::error!("Token encoding error: {e}");
                ApiError::Internal
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
