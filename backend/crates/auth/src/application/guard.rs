//! Access Control Guard
//!
//! Pure checks over verified access token claims. Decisions are made from
//! the claims alone; no database round-trip. Role or tenant changes take
//! effect at the next token issue, bounded by the access TTL.

use uuid::Uuid;

use crate::application::token::Claims;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Require the caller to hold one of the allowed roles
pub fn require_role(claims: &Claims, allowed: &[UserRole]) -> AuthResult<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Require the caller to belong to the given company.
///
/// Platform admins bypass tenant scoping. A company-scoped caller with no
/// company claim is denied.
pub fn require_company(claims: &Claims, company_id: Uuid) -> AuthResult<()> {
    if claims.role.is_platform_admin() {
        return Ok(());
    }
    match claims.company_id {
        Some(cid) if cid == company_id => Ok(()),
        _ => Err(AuthError::Forbidden),
    }
}

/// Require the caller to be acting on their own resource.
///
/// Platform admins bypass the self check.
pub fn require_self(claims: &Claims, owner_id: Uuid) -> AuthResult<()> {
    if claims.role.is_platform_admin() {
        return Ok(());
    }
    if claims.sub == owner_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
