//! In-memory user store.
//!
//! Backs the integration tests and embedded hosts that run without a
//! database. Mirrors the PostgreSQL adapter's semantics, including the
//! first-caller-wins refresh claim.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, UserStore, fingerprint};
use crate::models::{NewUser, UserRecord};

struct JtiEntry {
    expires_at: DateTime<Utc>,
    revoked: bool,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    ids_by_email: HashMap<String, String>,
    refresh_jtis: HashMap<String, JtiEntry>,
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, bypassing ID generation. Test seam.
    pub fn seed(&self, record: UserRecord) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner
            .ids_by_email
            .insert(record.email.clone(), record.id.clone());
        inner.users.insert(record.id.clone(), record);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .ids_by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.users.get(id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if inner.ids_by_email.contains_key(&user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        let record = UserRecord {
            id: Uuid::now_v7().to_string(),
            email: user.email,
            display_name: user.display_name,
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            membership: user.membership,
            verified: user.verified,
            status: user.status,
            avatar_url: user.avatar_url,
            created_at: Utc::now(),
        };
        inner
            .ids_by_email
            .insert(record.email.clone(), record.id.clone());
        inner.users.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn store_refresh_jti(
        &self,
        jti: &str,
        _user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.refresh_jtis.insert(
            fingerprint(jti),
            JtiEntry {
                expires_at,
                revoked: false,
            },
        );
        Ok(())
    }

    async fn claim_refresh_jti(&self, jti: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        match inner.refresh_jtis.get_mut(&fingerprint(jti)) {
            Some(entry) if !entry.revoked && entry.expires_at > Utc::now() => {
                entry.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
