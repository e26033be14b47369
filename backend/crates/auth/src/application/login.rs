//! Login Use Case
//!
//! Authenticates a user by email + password and mints an access token
//! plus the first refresh token of a new session chain.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::AuthConfig;
use crate::application::token::{Claims, TokenCodec};
use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed access token
    pub access_token: String,
    /// Clear text refresh token (only surfaced here, digest persisted)
    pub refresh_token: String,
    /// Authenticated user
    pub user: User,
}

/// Login use case
pub struct LoginUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<U, R> LoginUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        refresh_repo: Arc<R>,
        codec: Arc<TokenCodec>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            refresh_repo,
            codec,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = match Email::new(&input.email) {
            Ok(email) => email,
            Err(_) => {
                equalize_timing(&input.password);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let user = self.user_repo.find_by_email(&email).await?;

        let mut user = match user {
            Some(user) => user,
            None => {
                // Unknown email burns the same Argon2 cost as a real
                // verification, so response timing does not leak which
                // addresses have accounts.
                equalize_timing(&input.password);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if user.is_locked() {
            return Err(AuthError::AccountLocked);
        }
        if !user.status.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let password = ClearTextPassword::new(input.password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        if !user.password_hash.verify(&password, self.config.pepper()) {
            user.record_failure();
            self.user_repo.update(&user).await?;
            return Err(AuthError::InvalidCredentials);
        }

        user.record_login();
        self.user_repo.update(&user).await?;

        // Start a new refresh chain; its id doubles as the session id
        let refresh_clear =
            platform::crypto::to_base64url(&platform::crypto::random_bytes(32));
        let refresh_hash = platform::crypto::sha256(refresh_clear.as_bytes()).to_vec();
        let refresh =
            RefreshToken::new_chain(user.user_id, refresh_hash, self.config.refresh_ttl);
        self.refresh_repo.create(&refresh).await?;

        let now = Utc::now();
        let claims = Claims {
            sub: user.user_id.into_uuid(),
            role: user.role,
            company_id: user.company_id.map(|c| c.into_uuid()),
            sid: refresh.chain_id,
            iat: now.timestamp(),
            exp: (now + self.config.access_ttl).timestamp(),
        };
        let access_token = self.codec.issue(&claims)?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            session_id = %refresh.chain_id,
            "User logged in"
        );

        Ok(LoginOutput {
            access_token,
            refresh_token: refresh_clear,
            user,
        })
    }
}

/// Verify the candidate password against a fixed dummy hash.
///
/// Called on the failure paths that would otherwise skip Argon2 entirely.
fn equalize_timing(password: &str) {
    static DUMMY_HASH: OnceLock<HashedPassword> = OnceLock::new();
    let dummy = DUMMY_HASH.get_or_init(|| {
        ClearTextPassword::new("timing-equalization-dummy".to_string())
            .expect("dummy password is valid")
            .hash(None)
            .expect("dummy hash succeeds")
    });

    if let Ok(candidate) = ClearTextPassword::new(password.to_string()) {
        let _ = dummy.verify(&candidate, None);
    }
}
