//! Authentication and authorization logic.
//!
//! Provides the token codec, password hashing, role gating, and the
//! session record shared across `pulse_api` and embedded hosts.

pub mod password;
pub mod roles;
pub mod session;
pub mod token;
pub mod vault;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Token error: {0}")]
    TokenError(#[from] token::TokenError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] crate::store::StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
