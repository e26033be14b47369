//! API DTOs (Data Transfer Objects)
//!
//! Wire format is snake_case JSON throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_role::UserRole, user_status::UserStatus};

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

// ============================================================================
// Refresh
// ============================================================================

/// Refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

// ============================================================================
// Password Reset
// ============================================================================

/// Forgot password request
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset password request
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ============================================================================
// Common
// ============================================================================

/// Generic message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User representation in responses (no credential material)
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.into_uuid(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            role: user.role,
            company_id: user.company_id.map(|c| c.into_uuid()),
            status: user.status,
            last_login_at: user.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_omits_absent_company() {
        let dto = UserDto {
            user_id: Uuid::new_v4(),
            email: "parent@example.com".to_string(),
            name: "Parent".to_string(),
            role: UserRole::Parent,
            company_id: None,
            status: UserStatus::Active,
            last_login_at: None,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("company_id").is_none());
        assert_eq!(json["role"], "parent");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_login_request_snake_case() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"email": "a@b.co", "password": "Secret99!"}"#,
        )
        .unwrap();
        assert_eq!(req.email, "a@b.co");
    }

    #[test]
    fn test_reset_request_snake_case() {
        let req: ResetPasswordRequest = serde_json::from_str(
            r#"{"reset_token": "t", "new_password": "a", "confirm_password": "a"}"#,
        )
        .unwrap();
        assert_eq!(req.reset_token, "t");
    }
}
