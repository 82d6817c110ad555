//! API server configuration.

use pulse_core::config::{AuthConfig, ConfigError};

/// Configuration for the auth API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3200").
    pub bind_addr: String,
    /// Auth core configuration (secrets, TTLs, session window).
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// `BIND_ADDR` defaults to `127.0.0.1:3200`; the auth secrets are
    /// required and their absence is a hard error (see
    /// [`AuthConfig::from_env`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3200".into()),
            auth: AuthConfig::from_env()?,
        })
    }
}
