//! Auth Middleware
//!
//! Bearer token verification for protected routes. Verified claims are
//! stored in request extensions for handlers and downstream guards.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

use crate::application::token::{Claims, TokenCodec};
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub codec: Arc<TokenCodec>,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid access token.
///
/// On success the verified [`Claims`] are inserted into request extensions.
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_bearer(req.headers()) {
        Some(token) => token,
        None => return Err(AuthError::Unauthenticated.into_response()),
    };

    let claims: Claims = match state.codec.verify(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Verify the bearer token on a request without going through middleware.
///
/// Used by handlers that live outside a `require_auth` layer (e.g. logout).
pub fn verify_request(codec: &TokenCodec, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let token = extract_bearer(headers).ok_or(AuthError::Unauthenticated)?;
    codec.verify(token, Utc::now())
}
