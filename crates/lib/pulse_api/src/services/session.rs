//! Session store adapter.
//!
//! The single write path for session state: every save updates the cookie
//! and the durable vault together, so the two locations never diverge
//! across scattered call sites. Vault writes are best-effort — a failure
//! is logged and the login still succeeds.

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Duration, Utc};
use tracing::warn;

use pulse_core::auth::session::Session;
use pulse_core::auth::token::Claims;
use pulse_core::auth::vault::SessionVault;
use pulse_core::models::UserRecord;

use super::cookies;

/// Dual-location session persistence.
pub struct SessionAdapter {
    vault: Arc<dyn SessionVault>,
    window: Duration,
}

impl SessionAdapter {
    pub fn new(vault: Arc<dyn SessionVault>, window: Duration) -> Self {
        Self { vault, window }
    }

    /// Build a fresh session for a principal and persist it.
    pub fn establish(&self, record: &UserRecord) -> (Session, Cookie<'static>) {
        let now = Utc::now();
        let session = Session {
            principal_id: record.id.clone(),
            email: record.email.clone(),
            display_name: record.display_name.clone(),
            role: record.role,
            membership: record.membership.clone(),
            avatar_url: record.avatar_url.clone(),
            profile: None,
            expires_at: now + self.window,
            last_activity: now,
        };
        let cookie = self.save(&session);
        (session, cookie)
    }

    /// Minimal session derived from still-valid token claims, for requests
    /// that arrive with a token but no persisted session.
    pub fn from_claims(&self, claims: &Claims) -> Session {
        let now = Utc::now();
        Session {
            principal_id: claims.sub.clone(),
            email: claims.email.clone(),
            display_name: claims
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
            role: claims.role,
            membership: claims.membership.clone(),
            avatar_url: None,
            profile: None,
            expires_at: now + self.window,
            last_activity: now,
        }
    }

    /// Persist to both locations; returns the cookie to attach to the
    /// response. The vault write never fails the caller.
    pub fn save(&self, session: &Session) -> Cookie<'static> {
        if let Err(e) = self.vault.put(session) {
            warn!(principal = %session.principal_id, error = %e, "session vault write failed");
        }
        match cookies::session_cookie(session) {
            Ok(cookie) => cookie,
            Err(e) => {
                // Serialization of a well-formed session record cannot
                // realistically fail; fall back to clearing.
                warn!(error = %e, "session cookie serialization failed");
                cookies::clear_session_cookie()
            }
        }
    }

    /// Read the session: cookie first (authoritative for navigation
    /// requests), vault as fallback when a principal hint is available.
    pub fn read(&self, jar: &CookieJar, principal_hint: Option<&str>) -> Option<Session> {
        jar.get(cookies::SESSION_COOKIE)
            .and_then(|c| cookies::parse_session(c.value()))
            .or_else(|| principal_hint.and_then(|id| self.vault.get(id)))
    }

    /// Slide the expiry window; on an expired session, purge every
    /// persisted copy and return `None` (forced logout).
    pub fn touch(&self, session: Session) -> Option<(Session, Cookie<'static>)> {
        let principal_id = session.principal_id.clone();
        match session.touch(self.window) {
            Some(touched) => {
                let cookie = self.save(&touched);
                Some((touched, cookie))
            }
            None => {
                self.vault.remove(&principal_id);
                None
            }
        }
    }

    /// Clear both locations. Idempotent.
    pub fn clear(&self, principal_id: Option<&str>) -> Cookie<'static> {
        if let Some(id) = principal_id {
            self.vault.remove(id);
        }
        cookies::clear_session_cookie()
    }
}
