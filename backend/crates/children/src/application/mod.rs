//! Application Layer

pub mod bulk_onboard;
pub mod link_child;
pub mod query;
pub mod update_child;

// Re-exports
pub use bulk_onboard::{BulkOnboardUseCase, ChildInput};
pub use link_child::{LinkChildUseCase, LinkOutput};
pub use query::ChildrenQueryUseCase;
pub use update_child::{ChildPatch, UpdateChildUseCase};
