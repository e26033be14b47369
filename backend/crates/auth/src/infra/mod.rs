//! Infrastructure Layer
//!
//! Database implementations and outbound mail.

pub mod mailer;
pub mod postgres;

pub use mailer::TracingMailer;
pub use postgres::PgAuthRepository;
