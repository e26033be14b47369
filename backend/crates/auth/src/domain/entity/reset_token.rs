//! Password Reset Token Entity
//!
//! Single-use opaque token delivered out-of-band. Only the SHA-256 digest
//! is stored; `consumed_at` makes the token single-use.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{ResetTokenId, UserId};

/// Password reset token entity
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    /// Token record ID
    pub token_id: ResetTokenId,
    /// Owning user
    pub user_id: UserId,
    /// SHA-256 digest of the opaque token string
    pub token_hash: Vec<u8>,
    /// Expiration time
    pub expires_at: DateTime<Utc>,
    /// Set when the token was used to reset a password
    pub consumed_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Create a new reset token record
    pub fn new(user_id: UserId, token_hash: Vec<u8>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token_id: ResetTokenId::new(),
            user_id,
            token_hash,
            expires_at: now + ttl,
            consumed_at: None,
            created_at: now,
        }
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if the token can still be used
    pub fn is_usable(&self) -> bool {
        self.consumed_at.is_none() && !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_usable() {
        let token = PasswordResetToken::new(UserId::new(), vec![0u8; 32], Duration::hours(1));
        assert!(token.is_usable());
    }

    #[test]
    fn test_consumed_token_not_usable() {
        let mut token = PasswordResetToken::new(UserId::new(), vec![0u8; 32], Duration::hours(1));
        token.consumed_at = Some(Utc::now());
        assert!(!token.is_usable());
    }

    #[test]
    fn test_expired_token_not_usable() {
        let mut token = PasswordResetToken::new(UserId::new(), vec![0u8; 32], Duration::hours(1));
        token.expires_at = Utc::now() - Duration::seconds(1);
        assert!(!token.is_usable());
    }
}
