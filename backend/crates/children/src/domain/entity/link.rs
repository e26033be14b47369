//! Parent-Child Link Entity

use chrono::{DateTime, Utc};
use kernel::id::{ChildId, UserId};

/// Guardian relation established by redeeming a linking code.
///
/// A child may have several linked parents and a parent several children;
/// the (parent, child) pair itself is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentChildLink {
    pub parent_id: UserId,
    pub child_id: ChildId,
    pub linked_at: DateTime<Utc>,
}

impl ParentChildLink {
    pub fn new(parent_id: UserId, child_id: ChildId) -> Self {
        Self {
            parent_id,
            child_id,
            linked_at: Utc::now(),
        }
    }
}
