//! Authentication endpoints.

use axum::http::{HeaderMap, header};
use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;

use pulse_core::auth::token::TokenKind;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{
    CheckRoleRequest, CheckRoleResponse, GoogleLoginRequest, GoogleLoginResponse,
    GoogleStateResponse, LoginRequest, LogoutResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse, TokenResponse, UserDto,
};
use crate::services::{auth, cookies};

/// POST /auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let (record, pair) = auth::login(&state, &req.email, &req.password).await?;
    let (_, cookie) = state.sessions.establish(&record);

    Ok((
        jar.add(cookie),
        Json(TokenResponse {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            token_type: "Bearer".to_string(),
            expires_in: state.config.auth.access_ttl.num_seconds(),
            user: UserDto::from(&record),
        }),
    ))
}

/// POST /auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let record = auth::register(&state, &req).await?;
    Ok(Json(RegisterResponse {
        user: UserDto::from(&record),
    }))
}

/// POST /auth/refresh
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RefreshRequest>,
) -> AppResult<(CookieJar, Json<RefreshResponse>)> {
    let (record, pair) = auth::refresh(&state, &req.refresh_token).await?;
    // Rotation counts as activity; re-establish the session window.
    let (_, cookie) = state.sessions.establish(&record);
    Ok((
        jar.add(cookie),
        Json(RefreshResponse {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            token_type: "Bearer".to_string(),
            expires_in: state.config.auth.access_ttl.num_seconds(),
        }),
    ))
}

/// GET /auth/google-state
///
/// Issues the anti-CSRF nonce ahead of the federated login round-trip.
/// The nonce travels back twice: in the login request body and in this
/// short-lived cookie, and the two must match.
pub async fn google_state_handler(
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<GoogleStateResponse>)> {
    let nonce = auth::google_state();
    let cookie = cookies::oauth_state_cookie(&nonce);
    Ok((jar.add(cookie), Json(GoogleStateResponse { state: nonce })))
}

/// POST /auth/google-login
pub async fn google_login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<GoogleLoginRequest>,
) -> AppResult<(CookieJar, Json<GoogleLoginResponse>)> {
    let issued = jar
        .get(cookies::OAUTH_STATE_COOKIE)
        .map(|c| c.value().to_string());

    let (record, pair, existing) = auth::google_login(&state, &req, issued.as_deref()).await?;
    let (_, session_cookie) = state.sessions.establish(&record);

    let jar = jar
        .add(session_cookie)
        .add(cookies::clear_oauth_state_cookie());

    Ok((
        jar,
        Json(GoogleLoginResponse {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            user: UserDto::from(&record),
            is_existing_user: existing,
        }),
    ))
}

/// POST /auth/check-role
pub async fn check_role_handler(
    State(state): State<AppState>,
    Json(req): Json<CheckRoleRequest>,
) -> AppResult<Json<CheckRoleResponse>> {
    let record = auth::check_role(&state, &req.email).await?;
    Ok(Json(CheckRoleResponse {
        id: record.id,
        email: record.email,
        role: record.role,
        display_name: record.display_name,
        verified: record.verified,
        status: record.status,
    }))
}

/// POST /auth/logout
///
/// Idempotent: clears the session cookie, the oauth-state cookie and any
/// durable session copy; succeeds whether or not a session existed.
///
/// The cookie is client-controlled, so only a verified access token may
/// name the principal whose durable session is removed. Without one the
/// cookies are still cleared and the vault copy ages out on its own.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    let principal = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.codec.verify(token, TokenKind::Access).ok())
        .map(|claims| claims.sub);

    let cleared = state.sessions.clear(principal.as_deref());
    let jar = jar.add(cleared).add(cookies::clear_oauth_state_cookie());

    (jar, Json(LogoutResponse { success: true }))
}
