//! Identity domain models.
//!
//! Internal records, distinct from the camelCase API DTOs in `pulse_api`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AccountStatus::Pending),
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(format!("unknown account status: {other}")),
        }
    }
}

/// Authoritative user record as held by the external store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    /// One-way salted hash. `None` for accounts that never set a password.
    pub password_hash: Option<String>,
    pub role: Role,
    pub membership: String,
    pub verified: bool,
    pub status: AccountStatus,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Whether logins are currently permitted for this account.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Insert payload for a new user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Role,
    pub membership: String,
    pub verified: bool,
    pub status: AccountStatus,
    pub avatar_url: Option<String>,
    /// Pending email-verification token, owned by the registration flow.
    pub verification_token: Option<String>,
}
