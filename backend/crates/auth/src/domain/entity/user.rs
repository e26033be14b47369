//! User Entity
//!
//! User account with credentials and login failure tracking.

use chrono::{DateTime, Utc};
use kernel::id::{CompanyId, UserId};
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, user_role::UserRole, user_status::UserStatus};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Email address (unique, used for login)
    pub email: Email,
    /// Display name
    pub name: String,
    /// Argon2id password hash
    pub password_hash: HashedPassword,
    /// Platform role
    pub role: UserRole,
    /// Tenant the user belongs to (None for parents and platform admins)
    pub company_id: Option<CompanyId>,
    /// Account status
    pub status: UserStatus,
    /// Consecutive login failure count
    pub login_failed_count: i32,
    /// Account locked until (temporary lockout after failures)
    pub locked_until: Option<DateTime<Utc>>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Maximum login failures before temporary lockout
    pub const MAX_LOGIN_FAILURES: i32 = 5;
    /// Lockout duration in minutes
    pub const LOCKOUT_MINUTES: i64 = 15;

    /// Create a new user
    pub fn new(
        email: Email,
        name: String,
        password_hash: HashedPassword,
        role: UserRole,
        company_id: Option<CompanyId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            name,
            password_hash,
            role,
            company_id,
            status: UserStatus::default(),
            login_failed_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if account is currently locked out
    pub fn is_locked(&self) -> bool {
        if let Some(locked_until) = self.locked_until {
            Utc::now() < locked_until
        } else {
            false
        }
    }

    /// Check if user can login (active status, not locked)
    pub fn can_login(&self) -> bool {
        self.status.can_login() && !self.is_locked()
    }

    /// Record a failed login attempt
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count += 1;
        self.updated_at = now;

        // Lock account after too many failures
        if self.login_failed_count >= Self::MAX_LOGIN_FAILURES {
            self.locked_until = Some(now + chrono::Duration::minutes(Self::LOCKOUT_MINUTES));
        }
    }

    /// Record successful login (resets failure tracking)
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.login_failed_count = 0;
        self.locked_until = None;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Update password
    pub fn update_password(&mut self, new_hash: HashedPassword) {
        self.password_hash = new_hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn test_user() -> User {
        let hash = ClearTextPassword::new("CorrectHorse9!".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        User::new(
            Email::new("parent@example.com").unwrap(),
            "Test Parent".to_string(),
            hash,
            UserRole::Parent,
            None,
        )
    }

    #[test]
    fn test_lockout_after_max_failures() {
        let mut user = test_user();
        for _ in 0..User::MAX_LOGIN_FAILURES {
            user.record_failure();
        }
        assert!(user.is_locked());
        assert!(!user.can_login());
    }

    #[test]
    fn test_not_locked_below_threshold() {
        let mut user = test_user();
        for _ in 0..(User::MAX_LOGIN_FAILURES - 1) {
            user.record_failure();
        }
        assert!(!user.is_locked());
        assert!(user.can_login());
    }

    #[test]
    fn test_successful_login_resets_failures() {
        let mut user = test_user();
        user.record_failure();
        user.record_failure();
        user.record_login();
        assert_eq!(user.login_failed_count, 0);
        assert!(user.locked_until.is_none());
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_disabled_user_cannot_login() {
        let mut user = test_user();
        user.status = UserStatus::Disabled;
        assert!(!user.can_login());
    }
}
