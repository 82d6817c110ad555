//! Authenticated principal endpoints.

use axum::{Extension, Json, extract::State};
use axum_extra::extract::CookieJar;

use pulse_core::auth::roles;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{MeResponse, SessionResponse, UserDto};
use crate::services::auth;

/// GET /user/me
///
/// Serves the live record when the store is reachable, degrading to the
/// verified claims during an outage.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<MeResponse>> {
    let record = auth::resolve_current_user(&state, &claims).await?;
    let membership = record.membership.clone();
    Ok(Json(MeResponse {
        user: UserDto::from(&record),
        membership,
    }))
}

/// GET /auth/session
///
/// Activity check: slides the session window and re-issues the cookie.
/// An expired (or absent) session is purged everywhere and rejected.
pub async fn session_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    // The cookie is client-controlled; one naming a different principal
    // than the verified token is discarded, not honored.
    let session = state
        .sessions
        .read(&jar, Some(&claims.sub))
        .filter(|session| session.principal_id == claims.sub)
        .unwrap_or_else(|| state.sessions.from_claims(&claims));

    let Some((session, cookie)) = state.sessions.touch(session) else {
        return Err(AppError::Unauthorized("Session expired".into()));
    };

    let home = roles::home_path(Some(session.role)).to_string();
    Ok((jar.add(cookie), Json(SessionResponse { session, home })))
}
