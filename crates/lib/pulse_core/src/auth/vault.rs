//! Durable session storage.
//!
//! The second leg of the dual-location session adapter: the cookie serves
//! request handling, the vault survives it. Writes are best-effort; a
//! vault failure degrades UX (forced re-login) but is never a security
//! issue, so callers log and proceed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use super::session::Session;

/// Vault failures.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("vault serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no data directory available")]
    NoDataDir,
}

/// Keyed durable storage for session records.
pub trait SessionVault: Send + Sync {
    fn put(&self, session: &Session) -> Result<(), VaultError>;
    fn get(&self, principal_id: &str) -> Option<Session>;
    /// Idempotent removal.
    fn remove(&self, principal_id: &str);
}

/// Mutex-guarded in-memory vault.
#[derive(Default)]
pub struct MemoryVault {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionVault for MemoryVault {
    fn put(&self, session: &Session) -> Result<(), VaultError> {
        self.sessions
            .lock()
            .expect("session vault poisoned")
            .insert(session.principal_id.clone(), session.clone());
        Ok(())
    }

    fn get(&self, principal_id: &str) -> Option<Session> {
        self.sessions
            .lock()
            .expect("session vault poisoned")
            .get(principal_id)
            .cloned()
    }

    fn remove(&self, principal_id: &str) {
        self.sessions
            .lock()
            .expect("session vault poisoned")
            .remove(principal_id);
    }
}

/// File-backed vault under the platform data directory, one JSON file per
/// principal. Used by embedded hosts that outlive a single process.
pub struct FileVault {
    dir: PathBuf,
}

impl FileVault {
    /// Vault under `<data_dir>/pulse/sessions`.
    pub fn open_default() -> Result<Self, VaultError> {
        let dir = dirs::data_dir()
            .ok_or(VaultError::NoDataDir)?
            .join("pulse")
            .join("sessions");
        Self::open(dir)
    }

    pub fn open(dir: PathBuf) -> Result<Self, VaultError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, principal_id: &str) -> PathBuf {
        // Principal IDs are UUIDs; no path traversal to worry about, but
        // keep non-alphanumerics out of filenames anyway.
        let safe: String = principal_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SessionVault for FileVault {
    fn put(&self, session: &Session) -> Result<(), VaultError> {
        let json = serde_json::to_vec(session)?;
        std::fs::write(self.path_for(&session.principal_id), json)?;
        Ok(())
    }

    fn get(&self, principal_id: &str) -> Option<Session> {
        let bytes = std::fs::read(self.path_for(principal_id)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn remove(&self, principal_id: &str) {
        let _ = std::fs::remove_file(self.path_for(principal_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use chrono::{Duration, Utc};

    fn session(id: &str) -> Session {
        let now = Utc::now();
        Session {
            principal_id: id.into(),
            email: "a@b.c".into(),
            display_name: "A".into(),
            role: Role::User,
            membership: "free".into(),
            avatar_url: None,
            profile: None,
            expires_at: now + Duration::hours(2),
            last_activity: now,
        }
    }

    #[test]
    fn memory_vault_round_trip() {
        let vault = MemoryVault::new();
        vault.put(&session("u-1")).unwrap();
        assert_eq!(vault.get("u-1").unwrap().email, "a@b.c");
        vault.remove("u-1");
        vault.remove("u-1"); // idempotent
        assert!(vault.get("u-1").is_none());
    }

    #[test]
    fn file_vault_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FileVault::open(dir.path().to_path_buf()).unwrap();
        vault.put(&session("u-2")).unwrap();
        let loaded = vault.get("u-2").unwrap();
        assert_eq!(loaded.principal_id, "u-2");
        vault.remove("u-2");
        vault.remove("u-2");
        assert!(vault.get("u-2").is_none());
    }
}
