//! Application Layer
//!
//! Use cases, configuration, token codec, and the access control guard.

pub mod config;
pub mod forgot_password;
pub mod guard;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod reset_password;
pub mod token;

// Re-exports
pub use config::{AuthConfig, SigningKey, SigningKeySet};
pub use forgot_password::ForgotPasswordUseCase;
pub use guard::{require_company, require_role, require_self};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use token::{Claims, TokenCodec};
