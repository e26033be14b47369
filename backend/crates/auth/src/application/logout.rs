//! Logout Use Case
//!
//! Revokes the refresh chain named by the caller's `sid` claim. Outstanding
//! access tokens keep working until their TTL runs out; there is no
//! denylist.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>) -> Self {
        Self { refresh_repo }
    }

    /// Revoke the session chain. Idempotent: logging out an already-dead
    /// session succeeds quietly.
    pub async fn execute(&self, session_id: Uuid) -> AuthResult<()> {
        let revoked = self.refresh_repo.revoke_chain(session_id).await?;

        tracing::info!(
            session_id = %session_id,
            revoked,
            "User logged out"
        );

        Ok(())
    }
}
