//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ChildrenAppState;
pub use router::{admin_router, children_router};
