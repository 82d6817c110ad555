//! PostgreSQL-backed user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, UserStore, fingerprint};
use crate::auth::roles::Role;
use crate::models::{AccountStatus, NewUser, UserRecord};

/// User store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; enums travel as text and are parsed app-side.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    display_name: String,
    phone: Option<String>,
    password_hash: Option<String>,
    role: String,
    membership: String,
    verified: bool,
    status: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, StoreError> {
        Ok(UserRecord {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            phone: row.phone,
            password_hash: row.password_hash,
            // Unrecognized role degrades to the default rather than
            // locking the account out of its own record.
            role: row.role.parse::<Role>().unwrap_or_default(),
            membership: row.membership,
            verified: row.verified,
            status: row.status.parse::<AccountStatus>().map_err(StoreError::Backend)?,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id::text, email, display_name, phone, password_hash, \
               role::text, membership, verified, status::text, avatar_url, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id::text, email, display_name, phone, password_hash, \
               role::text, membership, verified, status::text, avatar_url, created_at \
             FROM users WHERE id = $1::uuid",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users \
               (id, email, display_name, phone, password_hash, role, membership, \
                verified, status, avatar_url, verification_token) \
             VALUES ($1::uuid, $2, $3, $4, $5, $6::user_role, $7, $8, $9::account_status, $10, $11) \
             RETURNING id::text, email, display_name, phone, password_hash, \
               role::text, membership, verified, status::text, avatar_url, created_at",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.membership)
        .bind(user.verified)
        .bind(user.status.as_str())
        .bind(&user.avatar_url)
        .bind(&user.verification_token)
        .fetch_one(&self.pool)
        .await?;
        UserRecord::try_from(row)
    }

    async fn store_refresh_jti(
        &self,
        jti: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (id, jti_hash, user_id, expires_at) \
             VALUES ($1::uuid, $2, $3::uuid, $4)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(fingerprint(jti))
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn claim_refresh_jti(&self, jti: &str) -> Result<bool, StoreError> {
        // A single UPDATE claims the token; under concurrency exactly one
        // caller observes an affected row.
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = now() \
             WHERE jti_hash = $1 AND revoked_at IS NULL AND expires_at > now()",
        )
        .bind(fingerprint(jti))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
