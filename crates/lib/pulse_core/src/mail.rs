//! Mail transport abstraction.
//!
//! Delivery is fire-and-forget from the auth core's perspective: failures
//! are logged by the caller and never fail the operation that triggered
//! the email.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Mail delivery failures.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),
}

/// Outbound mail capability consumed by registration and reset flows.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_verification_email(
        &self,
        email: &str,
        name: &str,
        token: &str,
    ) -> Result<(), MailError>;

    async fn send_password_reset_email(
        &self,
        email: &str,
        name: &str,
        token: &str,
    ) -> Result<(), MailError>;
}

/// Transport that logs instead of sending. Used in development and tests.
#[derive(Default)]
pub struct TracingMailer;

#[async_trait]
impl MailTransport for TracingMailer {
    async fn send_verification_email(
        &self,
        email: &str,
        name: &str,
        _token: &str,
    ) -> Result<(), MailError> {
        info!(email, name, "would send verification email");
        Ok(())
    }

    async fn send_password_reset_email(
        &self,
        email: &str,
        name: &str,
        _token: &str,
    ) -> Result<(), MailError> {
        info!(email, name, "would send password reset email");
        Ok(())
    }
}
