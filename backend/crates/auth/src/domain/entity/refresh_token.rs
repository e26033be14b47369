//! Refresh Token Entity
//!
//! One link in a rotating refresh-token chain. The chain id doubles as the
//! session id carried in access token claims, so revoking a chain ends the
//! session everywhere a refresh would be attempted.
//!
//! Only the SHA-256 digest of the opaque token string is stored. The clear
//! text token exists only in the HTTP response that delivered it.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{RefreshTokenId, UserId};
use uuid::Uuid;

/// Refresh token entity
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Token record ID
    pub token_id: RefreshTokenId,
    /// Owning user
    pub user_id: UserId,
    /// Session chain this token belongs to
    pub chain_id: Uuid,
    /// SHA-256 digest of the opaque token string
    pub token_hash: Vec<u8>,
    /// Expiration time
    pub expires_at: DateTime<Utc>,
    /// Set when this token was exchanged for a successor
    pub rotated_at: Option<DateTime<Utc>>,
    /// Set when the chain was revoked (logout, reuse, password reset)
    pub revoked_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Create the first token of a new chain
    pub fn new_chain(user_id: UserId, token_hash: Vec<u8>, ttl: Duration) -> Self {
        Self::in_chain(user_id, Uuid::new_v4(), token_hash, ttl)
    }

    /// Create a successor token within an existing chain
    pub fn in_chain(user_id: UserId, chain_id: Uuid, token_hash: Vec<u8>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token_id: RefreshTokenId::new(),
            user_id,
            chain_id,
            token_hash,
            expires_at: now + ttl,
            rotated_at: None,
            revoked_at: None,
            created_at: now,
        }
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if this token is the live head of its chain
    pub fn is_active(&self) -> bool {
        self.rotated_at.is_none() && self.revoked_at.is_none() && !self.is_expired()
    }

    /// Check if the token was already exchanged (replay if presented again)
    pub fn is_rotated(&self) -> bool {
        self.rotated_at.is_some()
    }

    /// Check if the chain was revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chain_is_active() {
        let token = RefreshToken::new_chain(UserId::new(), vec![0u8; 32], Duration::days(30));
        assert!(token.is_active());
        assert!(!token.is_expired());
        assert!(!token.is_rotated());
        assert!(!token.is_revoked());
    }

    #[test]
    fn test_expired_token_not_active() {
        let mut token = RefreshToken::new_chain(UserId::new(), vec![0u8; 32], Duration::days(30));
        token.expires_at = Utc::now() - Duration::seconds(1);
        assert!(token.is_expired());
        assert!(!token.is_active());
    }

    #[test]
    fn test_successor_shares_chain() {
        let first = RefreshToken::new_chain(UserId::new(), vec![1u8; 32], Duration::days(30));
        let next = RefreshToken::in_chain(
            first.user_id,
            first.chain_id,
            vec![2u8; 32],
            Duration::days(30),
        );
        assert_eq!(first.chain_id, next.chain_id);
        assert_ne!(
            first.token_id.as_uuid(),
            next.token_id.as_uuid()
        );
    }
}
