//! Children (Child Linking) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Child, company, and link entities plus repository traits
//! - `application/` - Bulk onboarding, linking, queries, updates
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Bulk onboarding of children with generated one-time linking codes
//! - Parent-to-child linking by unique code (idempotent)
//! - Parent-scoped child listing and updates
//! - Tenant-scoped company lookup for admins

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{ChildrenError, ChildrenResult};
pub use infra::postgres::PgChildrenRepository;
pub use presentation::router::{admin_router, children_router};
