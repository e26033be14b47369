//! Mailer Port
//!
//! Outbound mail interface for the password reset flow. The application
//! layer never sees delivery details; infrastructure provides the transport.

use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Outbound mail trait
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver a password reset token to the account's email address.
    ///
    /// `reset_token` is the clear text opaque token; it must not be logged.
    async fn send_password_reset(&self, to: &Email, reset_token: &str) -> AuthResult<()>;
}
