//! Query Use Cases

use std::sync::Arc;

use kernel::id::{CompanyId, UserId};

use crate::domain::entity::{child::Child, company::Company};
use crate::domain::repository::ChildrenRepository;
use crate::error::{ChildrenError, ChildrenResult};

/// Read-side use cases for children and companies
pub struct ChildrenQueryUseCase<C>
where
    C: ChildrenRepository,
{
    repo: Arc<C>,
}

impl<C> ChildrenQueryUseCase<C>
where
    C: ChildrenRepository,
{
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    /// List children linked to a parent
    pub async fn children_of_parent(&self, parent_id: &UserId) -> ChildrenResult<Vec<Child>> {
        self.repo.find_by_parent(parent_id).await
    }

    /// Fetch a company record
    pub async fn company(&self, company_id: &CompanyId) -> ChildrenResult<Company> {
        self.repo
            .find_company(company_id)
            .await?
            .ok_or(ChildrenError::CompanyNotFound)
    }
}
