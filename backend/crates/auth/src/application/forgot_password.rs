//! Forgot Password Use Case
//!
//! Issues a single-use reset token and mails it out. The response is the
//! same whether or not the email exists, so the endpoint cannot be used to
//! enumerate accounts.

use std::sync::Arc;
use std::time::Duration;

use crate::application::config::AuthConfig;
use crate::domain::entity::reset_token::PasswordResetToken;
use crate::domain::mailer::Mailer;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Mail delivery attempts before giving up
const MAIL_MAX_ATTEMPTS: u32 = 3;
/// Initial backoff between attempts (doubles each retry)
const MAIL_RETRY_BASE: Duration = Duration::from_millis(500);

/// Forgot password use case
pub struct ForgotPasswordUseCase<U, R, M>
where
    U: UserRepository,
    R: ResetTokenRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    reset_repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, R, M> ForgotPasswordUseCase<U, R, M>
where
    U: UserRepository,
    R: ResetTokenRepository,
    M: Mailer,
{
    pub fn new(user_repo: Arc<U>, reset_repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            reset_repo,
            mailer,
            config,
        }
    }

    /// Always returns Ok for well-formed requests. Unknown emails, and even
    /// mail delivery failures, look identical to the happy path from the
    /// outside.
    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let email = match Email::new(email) {
            Ok(email) => email,
            Err(_) => return Ok(()),
        };

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Password reset requested for unknown email");
                return Ok(());
            }
        };

        // A new request supersedes any outstanding token
        self.reset_repo
            .invalidate_all_for_user(&user.user_id)
            .await?;

        let token_clear =
            platform::crypto::to_base64url(&platform::crypto::random_bytes(32));
        let token_hash = platform::crypto::sha256(token_clear.as_bytes()).to_vec();
        let token =
            PasswordResetToken::new(user.user_id, token_hash, self.config.reset_ttl);
        self.reset_repo.create(&token).await?;

        self.send_with_retry(&email, &token_clear).await;

        tracing::info!(user_id = %user.user_id, "Password reset token issued");

        Ok(())
    }

    /// Deliver the reset mail, retrying transient failures with doubling
    /// backoff. Final failure is logged, never surfaced to the caller.
    async fn send_with_retry(&self, email: &Email, token: &str) {
        let mut delay = MAIL_RETRY_BASE;
        for attempt in 1..=MAIL_MAX_ATTEMPTS {
            match self.mailer.send_password_reset(email, token).await {
                Ok(()) => return,
                Err(e) if attempt < MAIL_MAX_ATTEMPTS => {
                    tracing::warn!(
                        error = %e,
                        attempt,
                        "Password reset mail failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        attempts = MAIL_MAX_ATTEMPTS,
                        "Password reset mail failed, giving up"
                    );
                }
            }
        }
    }
}
