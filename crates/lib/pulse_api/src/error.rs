//! Application error types.
//!
//! Expected, user-recoverable outcomes map to 401/403 with short generic
//! messages; upstream failures map to an opaque 500 and are logged with
//! full context server-side.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use pulse_core::auth::AuthError;
use pulse_core::auth::token::TokenError;
use pulse_core::store::StoreError;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Upstream(String),
}

impl AppError {
    /// The one message every credential failure collapses into, so an
    /// unknown email is indistinguishable from a wrong password.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Invalid email or password".into())
    }

    /// Collapse a token failure into the generic 401, keeping the real
    /// reason in the logs only.
    pub fn from_token(e: TokenError) -> Self {
        debug!(reason = %e, "token verification failed");
        AppError::Unauthorized("Invalid or expired token".into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Upstream(detail) => {
                error!(detail, "upstream failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(key) => AppError::Validation(format!("Already exists: {key}")),
            StoreError::Backend(detail) => AppError::Upstream(detail),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::invalid_credentials(),
            AuthError::TokenError(e) => AppError::from_token(e),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::StoreError(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Upstream(msg),
        }
    }
}
