//! Repository Traits

use crate::domain::entity::{child::Child, company::Company, link::ParentChildLink};
use crate::domain::value_object::unique_code::UniqueCode;
use crate::error::ChildrenResult;
use kernel::id::{ChildId, CompanyId, UserId};

/// Children repository trait
#[trait_variant::make(ChildrenRepository: Send)]
pub trait LocalChildrenRepository {
    /// Persist a batch of children atomically: all rows or none.
    async fn create_batch(&self, children: &[Child]) -> ChildrenResult<()>;

    /// Find child by ID
    async fn find_by_id(&self, child_id: &ChildId) -> ChildrenResult<Option<Child>>;

    /// Find child by linking code (uppercase-normalized)
    async fn find_by_code(&self, code: &UniqueCode) -> ChildrenResult<Option<Child>>;

    /// List children linked to a parent
    async fn find_by_parent(&self, parent_id: &UserId) -> ChildrenResult<Vec<Child>>;

    /// Update child demographic fields
    async fn update(&self, child: &Child) -> ChildrenResult<()>;

    /// Establish a parent-child link, idempotently.
    ///
    /// If the pair already exists the original link is returned unchanged.
    async fn link(&self, parent_id: &UserId, child_id: &ChildId)
    -> ChildrenResult<ParentChildLink>;

    /// Look up an existing link
    async fn find_link(
        &self,
        parent_id: &UserId,
        child_id: &ChildId,
    ) -> ChildrenResult<Option<ParentChildLink>>;

    /// Find company by ID
    async fn find_company(&self, company_id: &CompanyId) -> ChildrenResult<Option<Company>>;
}
