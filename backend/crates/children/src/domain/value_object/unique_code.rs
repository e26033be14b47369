//! Unique Linking Code Value Object
//!
//! One-time-generated credential authorizing a parent to link to a child.
//! Eight characters from an unambiguous uppercase alphabet; matching is
//! case-insensitive, storage is uppercase.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Code length in characters (32^8 possible codes)
pub const CODE_LENGTH: usize = 8;

/// Child linking code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueCode(String);

impl UniqueCode {
    /// Generate a fresh random code
    pub fn generate() -> Self {
        Self(platform::crypto::random_code(CODE_LENGTH))
    }

    /// Parse client input: uppercase, then validate length and alphabet
    pub fn parse(input: &str) -> AppResult<Self> {
        let code = input.trim().to_uppercase();

        if code.len() != CODE_LENGTH {
            return Err(AppError::bad_request(format!(
                "Code must be exactly {} characters",
                CODE_LENGTH
            )));
        }

        if !code
            .bytes()
            .all(|b| platform::crypto::CODE_ALPHABET.contains(&b))
        {
            return Err(AppError::bad_request("Code contains invalid characters"));
        }

        Ok(Self(code))
    }

    /// Create from database value (assumed already normalized)
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UniqueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_alphabet() {
        let code = UniqueCode::generate();
        assert_eq!(code.as_str().len(), CODE_LENGTH);
        assert!(
            code.as_str()
                .bytes()
                .all(|b| platform::crypto::CODE_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        let code = UniqueCode::parse("abcdefgh").unwrap();
        assert_eq!(code.as_str(), "ABCDEFGH");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code = UniqueCode::parse("  ABCDEFGH ").unwrap();
        assert_eq!(code.as_str(), "ABCDEFGH");
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        assert!(UniqueCode::parse("ABC").is_err());
        assert!(UniqueCode::parse("ABCDEFGHJ").is_err());
    }

    #[test]
    fn test_parse_rejects_ambiguous_characters() {
        // 0, O, 1, I are not in the alphabet
        assert!(UniqueCode::parse("ABCDEF01").is_err());
        assert!(UniqueCode::parse("ABCDEFIO").is_err());
    }

    #[test]
    fn test_generated_codes_differ() {
        let a = UniqueCode::generate();
        let b = UniqueCode::generate();
        assert_ne!(a, b);
    }
}
