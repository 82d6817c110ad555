//! Authentication middleware — Bearer token extraction and verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use pulse_core::auth::roles::{self, Role};
use pulse_core::auth::token::{Claims, TokenKind};

use crate::AppState;
use crate::error::AppError;

/// Verified access claims stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

/// Extracts `Authorization: Bearer <token>`, verifies it as an access
/// token and injects [`AuthenticatedUser`] into request extensions.
///
/// A refresh token presented here fails verification on its kind (and,
/// with distinct secrets, already on its signature).
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let claims = state
        .codec
        .verify(token, TokenKind::Access)
        .map_err(AppError::from_token)?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

/// Role gate for admin-only routes. Must run after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let role = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.0.role);

    if !roles::is_allowed(role, &[Role::Admin]) {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    Ok(next.run(request).await)
}
