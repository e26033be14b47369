//! Refresh Use Case
//!
//! Exchanges a live refresh token for a new access/refresh pair. Every
//! refresh rotates; presenting an already-rotated token is treated as
//! replay and revokes the entire chain.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::token::{Claims, TokenCodec};
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Refresh output
#[derive(Debug)]
pub struct RefreshOutput {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<U, R> RefreshUseCase<U, R>
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

    pub async fn execute(&self, presented: &str) -> AuthResult<RefreshOutput> {
        let hash = platform::crypto::sha256(presented.as_bytes());

        let token = self
            .refresh_repo
            .find_by_hash(&hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if token.is_revoked() {
            return Err(AuthError::InvalidToken);
        }

        if token.is_rotated() {
            // Replay of a spent token. The legitimate successor may already
            // be in an attacker's hands, so the whole chain dies.
            let revoked = self.refresh_repo.revoke_chain(token.chain_id).await?;
            tracing::warn!(
                user_id = %token.user_id,
                session_id = %token.chain_id,
                revoked,
                "Refresh token replay, chain revoked"
            );
            return Err(AuthError::TokenReuseDetected);
        }

        if token.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        // Atomic claim: under concurrent refresh of the same token exactly
        // one caller wins. Losers are indistinguishable from replay.
        if !self.refresh_repo.mark_rotated(&token.token_id).await? {
            let revoked = self.refresh_repo.revoke_chain(token.chain_id).await?;
            tracing::warn!(
                user_id = %token.user_id,
                session_id = %token.chain_id,
                revoked,
                "Lost rotation race, chain revoked"
            );
            return Err(AuthError::TokenReuseDetected);
        }

        let user = self
            .user_repo
            .find_by_id(&token.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.status.can_login() {
            self.refresh_repo.revoke_chain(token.chain_id).await?;
            return Err(AuthError::AccountDisabled);
        }

        // Mint the successor within the same chain
        let next_clear =
            platform::crypto::to_base64url(&platform::crypto::random_bytes(32));
        let next_hash = platform::crypto::sha256(next_clear.as_bytes()).to_vec();
        let next = RefreshToken::in_chain(
            user.user_id,
            token.chain_id,
            next_hash,
            self.config.refresh_ttl,
        );
        self.refresh_repo.create(&next).await?;

        let now = Utc::now();
        let claims = Claims {
            sub: user.user_id.into_uuid(),
            role: user.role,
            company_id: user.company_id.map(|c| c.into_uuid()),
            sid: token.chain_id,
            iat: now.timestamp(),
            exp: (now + self.config.access_ttl).timestamp(),
        };
        let access_token = self.codec.issue(&claims)?;

        tracing::debug!(
            user_id = %user.user_id,
            session_id = %token.chain_id,
            "Refresh token rotated"
        );

        Ok(RefreshOutput {
            access_token,
            refresh_token: next_clear,
        })
    }
}
