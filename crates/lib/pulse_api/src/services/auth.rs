//! Authentication service — login, registration, refresh rotation and
//! federated login flows over the token codec and user store.
//!
//! Every credential failure collapses into the same generic outcome at
//! this layer; the distinguishing reason goes to the logs only.

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{debug, info, warn};
use uuid::Uuid;

use pulse_core::auth::password;
use pulse_core::auth::roles::Role;
use pulse_core::auth::token::{Claims, Issued, TokenKind};
use pulse_core::models::{AccountStatus, NewUser, UserRecord};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{GoogleLoginRequest, RegisterRequest};

/// Lowercase + trim, applied to every email before lookup or insert.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Access + refresh pair with the refresh rotation handle recorded.
pub struct TokenPair {
    pub access: Issued,
    pub refresh: Issued,
}

/// Issue a token pair for a record and register the refresh token's ID in
/// the rotation ledger.
pub async fn issue_pair(state: &AppState, record: &UserRecord) -> AppResult<TokenPair> {
    let access = state
        .codec
        .issue(
            &record.id,
            &record.email,
            record.role,
            &record.membership,
            TokenKind::Access,
        )
        .map_err(AppError::from_token)?;
    let refresh = state
        .codec
        .issue(
            &record.id,
            &record.email,
            record.role,
            &record.membership,
            TokenKind::Refresh,
        )
        .map_err(AppError::from_token)?;

    state
        .store
        .store_refresh_jti(
            &refresh.claims.jti,
            &record.id,
            Utc::now() + state.config.auth.refresh_ttl,
        )
        .await?;

    Ok(TokenPair { access, refresh })
}

/// Authenticate with email + password.
///
/// Unknown email, absent hash and wrong password all take a bcrypt
/// comparison and return the identical generic failure.
pub async fn login(state: &AppState, email: &str, pw: &str) -> AppResult<(UserRecord, TokenPair)> {
    let email = normalize_email(email);
    let record = state.store.find_by_email(&email).await?;

    let Some(record) = record else {
        // Burn the comparison so this path is not observably faster.
        let _ = password::verify_password_opt(pw, None);
        debug!(email, "login for unknown email");
        return Err(AppError::invalid_credentials());
    };

    if !password::verify_password_opt(pw, record.password_hash.as_deref())? {
        debug!(email, "login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    if !record.verified {
        return Err(AppError::Forbidden(
            "Please verify your email address before logging in".into(),
        ));
    }
    if !record.is_active() {
        debug!(email, status = record.status.as_str(), "login on inactive account");
        return Err(AppError::invalid_credentials());
    }

    let pair = issue_pair(state, &record).await?;
    info!(principal = %record.id, role = %record.role, "login succeeded");
    Ok((record, pair))
}

/// Rotate a refresh token: verify, claim its ID (single use), re-check the
/// live record and issue a fresh pair carrying the record's current role.
pub async fn refresh(state: &AppState, token: &str) -> AppResult<(UserRecord, TokenPair)> {
    let claims = state
        .codec
        .verify(token, TokenKind::Refresh)
        .map_err(AppError::from_token)?;

    // Exactly one concurrent caller wins the claim; everyone else is
    // treated as a replay.
    if !state.store.claim_refresh_jti(&claims.jti).await? {
        warn!(principal = %claims.sub, "refresh token replay detected");
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }

    let record = state
        .store
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;

    if !record.is_active() {
        debug!(principal = %record.id, "refresh on inactive account");
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }

    let pair = issue_pair(state, &record).await?;
    Ok((record, pair))
}

/// Federated (Google) login: find the account by provider email, or
/// auto-provision one when allowed.
///
/// Returns the record, the pair, and whether the account pre-existed.
pub async fn google_login(
    state: &AppState,
    req: &GoogleLoginRequest,
    issued_state: Option<&str>,
) -> AppResult<(UserRecord, TokenPair, bool)> {
    // The nonce issued before the redirect must come back unchanged.
    match (issued_state, req.state.as_deref()) {
        (Some(expected), Some(got)) if expected == got => {}
        (None, None) => {
            debug!("federated login without state nonce");
        }
        _ => {
            warn!("federated login state mismatch");
            return Err(AppError::Unauthorized("Invalid authentication state".into()));
        }
    }

    let email = normalize_email(&req.profile.email);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    if let Some(record) = state.store.find_by_email(&email).await? {
        if !record.is_active() {
            debug!(principal = %record.id, "federated login on inactive account");
            return Err(AppError::invalid_credentials());
        }
        let pair = issue_pair(state, &record).await?;
        info!(principal = %record.id, "federated login on existing account");
        return Ok((record, pair, true));
    }

    if !state.config.auth.auto_provision {
        return Err(AppError::NotFound("Account not found".into()));
    }

    let display_name = req
        .full_name
        .clone()
        .or_else(|| req.profile.name.clone())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    // The account never uses this password; it exists so the record is
    // shaped like any other and password login stays fail-closed.
    let placeholder: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    let record = state
        .store
        .insert(NewUser {
            email,
            display_name,
            phone: req.phone.clone(),
            password_hash: Some(password::hash_password(&placeholder)?),
            role: Role::User,
            membership: "free".into(),
            verified: true,
            status: AccountStatus::Active,
            avatar_url: req.profile.picture.clone(),
            verification_token: None,
        })
        .await?;

    let pair = issue_pair(state, &record).await?;
    info!(principal = %record.id, "federated login auto-provisioned account");
    Ok((record, pair, false))
}

/// Random nonce for the federated login round-trip.
pub fn google_state() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Register a new account. The account starts pending and unverified;
/// the verification email is fire-and-forget.
pub async fn register(state: &AppState, req: &RegisterRequest) -> AppResult<UserRecord> {
    let email = normalize_email(&req.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    let display_name = req.full_name.trim();
    if display_name.is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }

    let verification_token = Uuid::now_v7().simple().to_string();
    let record = state
        .store
        .insert(NewUser {
            email: email.clone(),
            display_name: display_name.to_string(),
            phone: req.phone.clone(),
            password_hash: Some(password::hash_password(&req.password)?),
            role: Role::User,
            membership: "free".into(),
            verified: false,
            status: AccountStatus::Pending,
            avatar_url: None,
            verification_token: Some(verification_token.clone()),
        })
        .await
        .map_err(|e| match e {
            pulse_core::store::StoreError::Duplicate(_) => {
                AppError::Validation("Email already registered".into())
            }
            other => AppError::from(other),
        })?;

    if let Err(e) = state
        .mailer
        .send_verification_email(&record.email, &record.display_name, &verification_token)
        .await
    {
        warn!(email = %record.email, error = %e, "verification email failed");
    }

    info!(principal = %record.id, "account registered");
    Ok(record)
}

/// Lookup-only role check by email, used by UI flow branching before the
/// password step.
pub async fn check_role(state: &AppState, email: &str) -> AppResult<UserRecord> {
    let email = normalize_email(email);
    state
        .store
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Resolve the current principal from verified access claims.
///
/// The live record wins when reachable. A store outage degrades to the
/// claims (stale but verified); an ID miss falls back to the email before
/// giving up.
pub async fn resolve_current_user(state: &AppState, claims: &Claims) -> AppResult<UserRecord> {
    match state.store.find_by_id(&claims.sub).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => match state.store.find_by_email(&claims.email).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(AppError::NotFound("User not found".into())),
            Err(e) => {
                warn!(error = %e, "user store unavailable, serving claims");
                Ok(record_from_claims(claims))
            }
        },
        Err(e) => {
            warn!(error = %e, "user store unavailable, serving claims");
            Ok(record_from_claims(claims))
        }
    }
}

/// Degraded projection built from token claims alone.
fn record_from_claims(claims: &Claims) -> UserRecord {
    UserRecord {
        id: claims.sub.clone(),
        email: claims.email.clone(),
        display_name: claims
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string(),
        phone: None,
        password_hash: None,
        role: claims.role,
        membership: claims.membership.clone(),
        verified: true,
        status: AccountStatus::Active,
        avatar_url: None,
        created_at: Utc::now(),
    }
}
