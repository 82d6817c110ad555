//! Request/response DTOs.
//!
//! CamelCase on the wire; sensitive record fields (password hash,
//! verification tokens) never appear in any response shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pulse_core::auth::roles::Role;
use pulse_core::auth::session::Session;
use pulse_core::models::{AccountStatus, UserRecord};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Safe user projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub membership: String,
    pub verified: bool,
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserDto {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            display_name: record.display_name.clone(),
            phone: record.phone.clone(),
            role: record.role,
            membership: record.membership.clone(),
            verified: record.verified,
            status: record.status,
            avatar_url: record.avatar_url.clone(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair plus the safe user projection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserDto,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Profile handed over by the federated identity provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    pub profile: GoogleProfile,
    /// Anti-CSRF nonce, compared against the previously issued value.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserDto,
    pub is_existing_user: bool,
}

/// Nonce issued ahead of a federated login round-trip.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleStateResponse {
    pub state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct CheckRoleRequest {
    pub email: String,
}

/// Lookup-only role projection used by UI flow branching.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRoleResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub display_name: String,
    pub verified: bool,
    pub status: AccountStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserDto,
    pub membership: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Refreshed session plus the canonical home destination for its role.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
    pub home: String,
}
