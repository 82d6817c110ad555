//! Auth configuration.
//!
//! Secrets are process-wide immutable configuration loaded once at startup.
//! Missing secrets are a hard error: token operations must fail closed
//! rather than fall back to a baked-in default in a deployed environment.

use chrono::Duration;
use thiserror::Error;

/// Default access token lifetime: 2 hours.
const DEFAULT_ACCESS_TTL_SECS: i64 = 2 * 60 * 60;

/// Default refresh token lifetime: 7 days.
const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Default sliding session window: 2 hours.
const DEFAULT_SESSION_WINDOW_SECS: i64 = 2 * 60 * 60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required secret: {0}")]
    MissingSecret(&'static str),

    #[error("invalid duration in {var}: {value}")]
    InvalidDuration { var: &'static str, value: String },

    #[error("access TTL must be strictly shorter than refresh TTL")]
    TtlOrder,
}

/// Auth core configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Secret for signing/verifying access tokens.
    pub access_secret: String,
    /// Secret for signing/verifying refresh tokens. Distinct from the
    /// access secret so a leak of one cannot mint the other kind.
    pub refresh_secret: String,
    /// Access token lifetime.
    pub access_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: Duration,
    /// Sliding session window.
    pub session_window: Duration,
    /// Whether federated login may silently create an account for an
    /// unknown email (with an unusable random password).
    pub auto_provision: bool,
}

impl AuthConfig {
    /// Build a config with default TTLs from the two signing secrets.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            session_window: Duration::seconds(DEFAULT_SESSION_WINDOW_SECS),
            auto_provision: true,
        }
    }

    /// Reads configuration from environment variables.
    ///
    /// | Variable                 | Default             |
    /// |--------------------------|---------------------|
    /// | `JWT_SECRET`             | required            |
    /// | `JWT_REFRESH_SECRET`     | required            |
    /// | `ACCESS_TOKEN_TTL_SECS`  | 7200 (2 h)          |
    /// | `REFRESH_TOKEN_TTL_SECS` | 604800 (7 d)        |
    /// | `SESSION_WINDOW_SECS`    | 7200 (2 h)          |
    /// | `GOOGLE_AUTO_PROVISION`  | true                |
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = required_secret("JWT_SECRET")?;
        let refresh_secret = required_secret("JWT_REFRESH_SECRET")?;

        let config = Self {
            access_secret,
            refresh_secret,
            access_ttl: duration_var("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
            refresh_ttl: duration_var("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?,
            session_window: duration_var("SESSION_WINDOW_SECS", DEFAULT_SESSION_WINDOW_SECS)?,
            auto_provision: std::env::var("GOOGLE_AUTO_PROVISION")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants: both secrets present, access TTL strictly
    /// shorter than refresh TTL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.is_empty() {
            return Err(ConfigError::MissingSecret("JWT_SECRET"));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigError::MissingSecret("JWT_REFRESH_SECRET"));
        }
        if self.access_ttl >= self.refresh_ttl {
            return Err(ConfigError::TtlOrder);
        }
        Ok(())
    }
}

fn required_secret(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingSecret(var)),
    }
}

fn duration_var(var: &'static str, default_secs: i64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(Duration::seconds(default_secs)),
        Ok(v) => {
            let secs = v
                .parse::<i64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidDuration { var, value: v })?;
            Ok(Duration::seconds(secs))
        }
    }
}
