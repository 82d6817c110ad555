//! User store abstraction.
//!
//! The relational user store is an external collaborator; this module
//! specifies only the interface the auth core needs, plus the refresh
//! rotation ledger that makes refresh tokens single-use.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{NewUser, UserRecord};

/// Store-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e
            && db.is_unique_violation()
        {
            return StoreError::Duplicate(db.message().to_string());
        }
        StoreError::Backend(e.to_string())
    }
}

/// SHA-256 fingerprint of a refresh token ID for at-rest storage.
pub(crate) fn fingerprint(jti: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jti.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Capabilities the auth core consumes from the external user store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a record by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a record by principal ID.
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new record (federated auto-registration and sign-up).
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Record a freshly issued refresh token ID.
    async fn store_refresh_jti(
        &self,
        jti: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Atomically claim a refresh token ID for rotation.
    ///
    /// Returns `true` exactly once per stored ID: the first caller wins,
    /// every later (or concurrent) caller gets `false`.
    async fn claim_refresh_jti(&self, jti: &str) -> Result<bool, StoreError>;
}
