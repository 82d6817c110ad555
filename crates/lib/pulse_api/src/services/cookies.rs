//! Cookie service — session and OAuth-state cookies.
//!
//! One cookie carries the serialized session record (base64url-encoded
//! JSON) so server-side checks work on page navigations that don't carry
//! the API access token.

use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::Duration;

use pulse_core::auth::session::Session;

/// Cookie name for the serialized session record.
pub const SESSION_COOKIE: &str = "pulse_session";
/// Cookie name for the federated-login anti-CSRF nonce.
pub const OAUTH_STATE_COOKIE: &str = "pulse_oauth_state";

/// Build the session cookie; max-age is the session's remaining lifetime.
pub fn session_cookie(session: &Session) -> Result<Cookie<'static>, serde_json::Error> {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(session)?);
    let max_age = session.remaining().num_seconds();
    Ok(Cookie::build((SESSION_COOKIE.to_string(), payload))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::seconds(max_age))
        .build())
}

/// Decode a session cookie value back into a record.
pub fn parse_session(value: &str) -> Option<Session> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expired cookie that clears the session.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), String::new()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Short-lived nonce cookie set before a federated login round-trip.
pub fn oauth_state_cookie(state: &str) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE.to_string(), state.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::minutes(10))
        .build()
}

/// Expired cookie that clears the nonce.
pub fn clear_oauth_state_cookie() -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE.to_string(), String::new()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}
