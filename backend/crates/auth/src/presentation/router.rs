//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenCodec;
use crate::domain::mailer::Mailer;
use crate::domain::repository::{RefreshTokenRepository, ResetTokenRepository, UserRepository};
use crate::infra::mailer::TracingMailer;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository and tracing mailer
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, TracingMailer::new(), config)
}

/// Create a generic Auth router for any repository and mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository
        + RefreshTokenRepository
        + ResetTokenRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let codec = Arc::new(TokenCodec::new(config.signing_keys.clone()));
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        codec,
        config: Arc::new(config),
    };

    Router::new()
        .route("/login", post(handlers::login::<R, M>))
        .route("/refresh", post(handlers::refresh::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, M>))
        .route("/reset-password", post(handlers::reset_password::<R, M>))
        .with_state(state)
}
