//! Mailer Implementations
//!
//! Real SMTP delivery is owned by a separate notification service; this
//! crate only hands tokens to the transport. `TracingMailer` logs the
//! delivery event (never the token) and is the default wiring in
//! development and tests.

use crate::domain::mailer::Mailer;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Mailer that records delivery via tracing instead of sending
#[derive(Debug, Clone, Default)]
pub struct TracingMailer;

impl TracingMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Mailer for TracingMailer {
    async fn send_password_reset(&self, to: &Email, reset_token: &str) -> AuthResult<()> {
        tracing::info!(
            to = %to,
            token_len = reset_token.len(),
            "Password reset mail dispatched"
        );
        Ok(())
    }
}
