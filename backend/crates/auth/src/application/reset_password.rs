//! Reset Password Use Case
//!
//! Consumes a single-use reset token, replaces the password hash, and
//! revokes every refresh chain the user has. Anyone holding a stolen
//! refresh token is logged out by the reset.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::repository::{RefreshTokenRepository, ResetTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Reset password input
pub struct ResetPasswordInput {
    pub reset_token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Reset password use case
pub struct ResetPasswordUseCase<U, R, S>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    S: ResetTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    reset_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, R, S> ResetPasswordUseCase<U, R, S>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    S: ResetTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        refresh_repo: Arc<R>,
        reset_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            refresh_repo,
            reset_repo,
            config,
        }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        if input.new_password != input.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        // Validate the new password before touching the token, so a policy
        // failure leaves the token usable for a corrected retry.
        let password = ClearTextPassword::new(input.new_password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        let hash = platform::crypto::sha256(input.reset_token.as_bytes());
        let token = self
            .reset_repo
            .find_by_hash(&hash)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if !token.is_usable() {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        // Atomic consume: a concurrent reset with the same token loses here
        if !self.reset_repo.consume(&token.token_id).await? {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let mut user = self
            .user_repo
            .find_by_id(&token.user_id)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        let new_hash = password.hash(self.config.pepper())?;
        user.update_password(new_hash);
        // A successful reset clears any lockout
        user.login_failed_count = 0;
        user.locked_until = None;
        self.user_repo.update(&user).await?;

        // Every session dies with the old password
        let revoked = self
            .refresh_repo
            .revoke_all_for_user(&user.user_id)
            .await?;
        self.reset_repo
            .invalidate_all_for_user(&user.user_id)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            sessions_revoked = revoked,
            "Password reset completed"
        );

        Ok(())
    }
}
