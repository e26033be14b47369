//! Domain Layer
//!
//! Contains entities, value objects, repository traits, and the mailer port.

pub mod entity;
pub mod mailer;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{refresh_token::RefreshToken, reset_token::PasswordResetToken, user::User};
pub use mailer::Mailer;
pub use repository::{RefreshTokenRepository, ResetTokenRepository, UserRepository};
