//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenCodec;
use crate::application::{
    ForgotPasswordUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase,
    ResetPasswordInput, ResetPasswordUseCase,
};
use crate::domain::mailer::Mailer;
use crate::domain::repository::{RefreshTokenRepository, ResetTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RefreshRequest,
    RefreshResponse, ResetPasswordRequest, UserDto,
};
use crate::presentation::middleware::verify_request;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
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
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
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
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        user: UserDto::from(&output.user),
    }))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh
pub async fn refresh<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
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
    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
pub async fn logout<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
) -> AuthResult<Json<MessageResponse>>
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
    let claims = verify_request(&state.codec, &headers)?;

    let use_case = LogoutUseCase::new(state.repo.clone());
    use_case.execute(claims.sid).await?;

    Ok(Json(MessageResponse::new("Logged out")))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /auth/forgot-password
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
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
    let use_case = ForgotPasswordUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    Ok(Json(MessageResponse::new(
        "If the email exists, a reset link has been sent",
    )))
}

/// POST /auth/reset-password
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
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
    let use_case = ResetPasswordUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    use_case
        .execute(ResetPasswordInput {
            reset_token: req.reset_token,
            new_password: req.new_password,
            confirm_password: req.confirm_password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password has been reset")))
}
