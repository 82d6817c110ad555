//! Service layer — the auth orchestrator and its session/cookie plumbing.

pub mod auth;
pub mod cookies;
pub mod session;
