//! Session record and sliding-window expiry.
//!
//! The session is a client-visible mirror of the authenticated identity,
//! distinct from the tokens. Its expiry slides forward on every validated
//! check instead of being fixed at login.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Persisted session state.
///
/// Extra provider-specific data stays in the namespaced `profile` field,
/// never merged flat into the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub principal_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_membership")]
    pub membership: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Role-specific profile payload (doctor/admin extras), opaque here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

fn default_membership() -> String {
    "free".to_string()
}

impl Session {
    /// Whether the session lifetime has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Remaining lifetime, clamped at zero.
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }

    /// Slide the expiry window forward from now.
    ///
    /// Returns `None` when the session has already expired; the caller is
    /// expected to purge all persisted copies in that case.
    pub fn touch(mut self, window: Duration) -> Option<Session> {
        if self.is_expired() {
            return None;
        }
        let now = Utc::now();
        self.last_activity = now;
        self.expires_at = now + window;
        Some(self)
    }
}
