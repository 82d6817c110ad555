//! # pulse_api
//!
//! HTTP surface of the Pulse auth core.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use pulse_core::auth::token::TokenCodec;
use pulse_core::mail::MailTransport;
use pulse_core::store::UserStore;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, user};
use crate::services::session::SessionAdapter;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// External user store.
    pub store: Arc<dyn UserStore>,
    /// Outbound mail transport.
    pub mailer: Arc<dyn MailTransport>,
    /// Token codec, built once from the configured secrets.
    pub codec: Arc<TokenCodec>,
    /// Dual-location session adapter.
    pub sessions: Arc<SessionAdapter>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/refresh", post(auth::refresh_handler))
        .route("/auth/google-login", post(auth::google_login_handler))
        .route("/auth/google-state", get(auth::google_state_handler))
        .route("/auth/check-role", post(auth::check_role_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route("/user/me", get(user::me_handler))
        .route("/auth/session", get(user::session_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Admin routes (require auth + admin role)
    let admin_routes = Router::new()
        .route("/admin/users/{id}", get(admin::get_user_handler))
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin_routes)
        .layer(cors)
        .with_state(state)
}
