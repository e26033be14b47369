//! Access Token Codec
//!
//! Compact signed token: three base64url segments (header, claims,
//! signature) joined by dots, signed with HMAC-SHA256. The header carries
//! the key id so verification survives signing key rotation.
//!
//! Tokens are stateless: nothing is persisted server-side and there is no
//! denylist. Revocation granularity is the access TTL; the refresh chain
//! is where sessions are actually killed.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::application::config::SigningKeySet;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Token header
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    kid: String,
}

/// Access token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: Uuid,
    /// Role at issue time
    pub role: UserRole,
    /// Tenant the user belongs to (absent for parents and platform admins)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    /// Session id: the refresh chain this token was minted under
    pub sid: Uuid,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Check if the claims are expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Stateless access token codec
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: SigningKeySet,
}

impl TokenCodec {
    pub fn new(keys: SigningKeySet) -> Self {
        Self { keys }
    }

    /// Issue a signed access token with the newest valid key
    pub fn issue(&self, claims: &Claims) -> AuthResult<String> {
        let now = Utc::now();
        let key = self
            .keys
            .signing_key(now)
            .ok_or_else(|| AuthError::Internal("No valid signing key".to_string()))?;

        let header = Header {
            alg: "HS256".to_string(),
            kid: key.key_id.clone(),
        };

        let header_json = serde_json::to_vec(&header)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let claims_json = serde_json::to_vec(claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            platform::crypto::to_base64url(&header_json),
            platform::crypto::to_base64url(&claims_json)
        );

        let mut mac = HmacSha256::new_from_slice(&key.secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            signing_input,
            platform::crypto::to_base64url(&signature)
        ))
    }

    /// Verify a token and return its claims
    ///
    /// Signature is checked before expiry, so a tampered-but-expired token
    /// reports the signature failure.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let mut parts = token.split('.');
        let (header_b64, claims_b64, sig_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(c), Some(s), None) => (h, c, s),
                _ => return Err(AuthError::TokenMalformed),
            };

        let header_json =
            platform::crypto::from_base64url(header_b64).map_err(|_| AuthError::TokenMalformed)?;
        let header: Header =
            serde_json::from_slice(&header_json).map_err(|_| AuthError::TokenMalformed)?;

        if header.alg != "HS256" {
            return Err(AuthError::TokenMalformed);
        }

        // Unknown or retired kid fails the same way as a bad signature
        let key = self
            .keys
            .verifying_key(&header.kid, now)
            .ok_or(AuthError::TokenInvalidSignature)?;

        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let mut mac = HmacSha256::new_from_slice(&key.secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        let expected = mac.finalize().into_bytes();

        let presented =
            platform::crypto::from_base64url(sig_b64).map_err(|_| AuthError::TokenMalformed)?;
        if !platform::crypto::constant_time_eq(&expected, &presented) {
            return Err(AuthError::TokenInvalidSignature);
        }

        let claims_json =
            platform::crypto::from_base64url(claims_b64).map_err(|_| AuthError::TokenMalformed)?;
        let claims: Claims =
            serde_json::from_slice(&claims_json).map_err(|_| AuthError::TokenMalformed)?;

        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::{SigningKey, SigningKeySet};
    use chrono::Duration;

    fn key_set() -> SigningKeySet {
        SigningKeySet::new(vec![SigningKey {
            key_id: "k1".to_string(),
            secret: [42u8; 32],
            valid_from: Utc::now() - Duration::hours(1),
            valid_until: None,
        }])
    }

    fn claims(exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            role: UserRole::Parent,
            company_id: None,
            sid: Uuid::new_v4(),
            iat: now,
            exp: now + exp_offset_secs,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = TokenCodec::new(key_set());
        let original = claims(900);
        let token = codec.issue(&original).unwrap();

        let verified = codec.verify(&token, Utc::now()).unwrap();
        assert_eq!(verified, original);
    }

    #[test]
    fn test_company_id_present_for_tenant_roles() {
        let codec = TokenCodec::new(key_set());
        let company = Uuid::new_v4();
        let mut c = claims(900);
        c.role = UserRole::Driver;
        c.company_id = Some(company);

        let token = codec.issue(&c).unwrap();
        let verified = codec.verify(&token, Utc::now()).unwrap();
        assert_eq!(verified.company_id, Some(company));
        assert_eq!(verified.role, UserRole::Driver);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(key_set());
        let token = codec.issue(&claims(-10)).unwrap();

        let err = codec.verify(&token, Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let codec = TokenCodec::new(key_set());
        let token = codec.issue(&claims(900)).unwrap();

        // Swap the claims segment for one with a different role
        let mut evil = claims(900);
        evil.role = UserRole::PlatformAdmin;
        let evil_b64 =
            platform::crypto::to_base64url(&serde_json::to_vec(&evil).unwrap());

        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], evil_b64, parts[2]);

        let err = codec.verify(&forged, Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalidSignature));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = TokenCodec::new(key_set());
        assert!(matches!(
            codec.verify("not-a-token", Utc::now()).unwrap_err(),
            AuthError::TokenMalformed
        ));
        assert!(matches!(
            codec.verify("a.b", Utc::now()).unwrap_err(),
            AuthError::TokenMalformed
        ));
        assert!(matches!(
            codec.verify("a.b.c.d", Utc::now()).unwrap_err(),
            AuthError::TokenMalformed
        ));
    }

    #[test]
    fn test_key_rotation_old_tokens_still_verify() {
        let old_key = SigningKey {
            key_id: "k1".to_string(),
            secret: [1u8; 32],
            valid_from: Utc::now() - Duration::days(10),
            valid_until: Some(Utc::now() + Duration::days(1)),
        };
        let new_key = SigningKey {
            key_id: "k2".to_string(),
            secret: [2u8; 32],
            valid_from: Utc::now() - Duration::hours(1),
            valid_until: None,
        };

        let old_codec = TokenCodec::new(SigningKeySet::new(vec![old_key.clone()]));
        let token_from_old = old_codec.issue(&claims(900)).unwrap();

        let rotated = TokenCodec::new(SigningKeySet::new(vec![old_key, new_key]));

        // Old token verifies against the rotated set via its kid
        assert!(rotated.verify(&token_from_old, Utc::now()).is_ok());

        // New tokens are signed with the newest key
        let fresh = rotated.issue(&claims(900)).unwrap();
        let header_b64 = fresh.split('.').next().unwrap();
        let header_json = platform::crypto::from_base64url(header_b64).unwrap();
        let header: serde_json::Value = serde_json::from_slice(&header_json).unwrap();
        assert_eq!(header["kid"], "k2");
    }

    #[test]
    fn test_retired_key_token_rejected() {
        let retired = SigningKey {
            key_id: "k1".to_string(),
            secret: [1u8; 32],
            valid_from: Utc::now() - Duration::days(10),
            valid_until: Some(Utc::now() + Duration::seconds(30)),
        };
        let codec = TokenCodec::new(SigningKeySet::new(vec![retired]));
        let token = codec.issue(&claims(900)).unwrap();

        // After the key's window closes the token stops verifying
        let later = Utc::now() + Duration::minutes(5);
        let err = codec.verify(&token, later).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalidSignature));
    }
}
