//! Link Child Use Case
//!
//! Redeems a linking code for the calling parent. Re-linking the same
//! (parent, child) pair returns the existing link unchanged.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::{child::Child, link::ParentChildLink};
use crate::domain::repository::ChildrenRepository;
use crate::domain::value_object::unique_code::UniqueCode;
use crate::error::{ChildrenError, ChildrenResult};

/// Link output: the link and the child it points at
#[derive(Debug)]
pub struct LinkOutput {
    pub link: ParentChildLink,
    pub child: Child,
}

/// Link child use case
pub struct LinkChildUseCase<C>
where
    C: ChildrenRepository,
{
    repo: Arc<C>,
}

impl<C> LinkChildUseCase<C>
where
    C: ChildrenRepository,
{
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, parent_id: UserId, code: &str) -> ChildrenResult<LinkOutput> {
        // A structurally invalid code can never match, so it reports the
        // same way as an unknown one.
        let code = UniqueCode::parse(code).map_err(|_| ChildrenError::CodeNotFound)?;

        let child = self
            .repo
            .find_by_code(&code)
            .await?
            .ok_or(ChildrenError::CodeNotFound)?;

        let link = self.repo.link(&parent_id, &child.child_id).await?;

        tracing::info!(
            parent_id = %parent_id,
            child_id = %child.child_id,
            "Parent linked to child"
        );

        Ok(LinkOutput { link, child })
    }
}
