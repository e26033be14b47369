//! Application Configuration
//!
//! Configuration for the Auth application layer, including the signing
//! key set used for access token rotation.

use chrono::{DateTime, Duration, Utc};

/// A single access-token signing key
///
/// Keys carry a validity window so rotation can overlap: a new key signs
/// while the previous key still verifies until its window closes.
#[derive(Debug, Clone)]
pub struct SigningKey {
    /// Key identifier carried in the token header
    pub key_id: String,
    /// HMAC-SHA256 secret (32 bytes)
    pub secret: [u8; 32],
    /// Start of validity window
    pub valid_from: DateTime<Utc>,
    /// End of validity window (None = no scheduled retirement)
    pub valid_until: Option<DateTime<Utc>>,
}

impl SigningKey {
    /// Check if the key is valid at the given instant
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if now < self.valid_from {
            return false;
        }
        match self.valid_until {
            Some(until) => now < until,
            None => true,
        }
    }
}

/// The set of signing keys known to the service
#[derive(Debug, Clone)]
pub struct SigningKeySet {
    keys: Vec<SigningKey>,
}

impl SigningKeySet {
    /// Create a key set. At least one key is required to issue tokens.
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }

    /// Create a single-key set with a random secret (for development)
    pub fn with_random_key() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(vec![SigningKey {
            key_id: "dev-1".to_string(),
            secret,
            valid_from: Utc::now() - Duration::minutes(1),
            valid_until: None,
        }])
    }

    /// The key new tokens are signed with: the valid key with the most
    /// recent `valid_from`.
    pub fn signing_key(&self, now: DateTime<Utc>) -> Option<&SigningKey> {
        self.keys
            .iter()
            .filter(|k| k.is_valid_at(now))
            .max_by_key(|k| k.valid_from)
    }

    /// Look up a key by id for verification. Expired or not-yet-valid keys
    /// are not returned, so tokens signed by retired keys stop verifying.
    pub fn verifying_key(&self, key_id: &str, now: DateTime<Utc>) -> Option<&SigningKey> {
        self.keys
            .iter()
            .find(|k| k.key_id == key_id && k.is_valid_at(now))
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token signing keys
    pub signing_keys: SigningKeySet,
    /// Access token TTL (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token TTL (30 days)
    pub refresh_ttl: Duration,
    /// Password reset token TTL (30 minutes)
    pub reset_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_keys: SigningKeySet::new(Vec::new()),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(30),
            reset_ttl: Duration::minutes(30),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing key (for development)
    pub fn with_random_secret() -> Self {
        Self {
            signing_keys: SigningKeySet::with_random_key(),
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
