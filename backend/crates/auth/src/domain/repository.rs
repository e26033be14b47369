//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    refresh_token::RefreshToken, reset_token::PasswordResetToken, user::User,
};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;
use kernel::id::UserId;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (lowercase-normalized)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update user (credentials, status, failure tracking)
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Refresh token repository trait
///
/// Tokens are looked up by digest, never by clear text.
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a new token (chain head or successor)
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Find a token by its SHA-256 digest
    async fn find_by_hash(&self, token_hash: &[u8]) -> AuthResult<Option<RefreshToken>>;

    /// Atomically claim a token for rotation.
    ///
    /// Returns `true` if this call set `rotated_at` on a token that was
    /// neither rotated nor revoked. Concurrent callers race on this; only
    /// one wins.
    async fn mark_rotated(&self, token_id: &kernel::id::RefreshTokenId) -> AuthResult<bool>;

    /// Revoke every non-revoked token in a chain
    async fn revoke_chain(&self, chain_id: Uuid) -> AuthResult<u64>;

    /// Revoke every non-revoked token across all of a user's chains
    async fn revoke_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// Delete expired token rows
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Password reset token repository trait
#[trait_variant::make(ResetTokenRepository: Send)]
pub trait LocalResetTokenRepository {
    /// Persist a new reset token
    async fn create(&self, token: &PasswordResetToken) -> AuthResult<()>;

    /// Find a reset token by its SHA-256 digest
    async fn find_by_hash(&self, token_hash: &[u8]) -> AuthResult<Option<PasswordResetToken>>;

    /// Atomically consume a token.
    ///
    /// Returns `true` if this call set `consumed_at` on an unconsumed token.
    async fn consume(&self, token_id: &kernel::id::ResetTokenId) -> AuthResult<bool>;

    /// Invalidate outstanding reset tokens for a user
    async fn invalidate_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// Delete expired token rows
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
