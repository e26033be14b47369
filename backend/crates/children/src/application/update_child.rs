//! Update Child Use Case
//!
//! A parent may patch demographic fields of a child they are linked to.
//! The linking code is never updatable.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use kernel::id::{ChildId, UserId};

use auth::AuthError;

use crate::domain::entity::child::Child;
use crate::domain::repository::ChildrenRepository;
use crate::domain::value_object::gender::Gender;
use crate::error::{ChildrenError, ChildrenResult};

/// Optional field updates; absent fields are left alone
#[derive(Debug, Clone, Default)]
pub struct ChildPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub grade: Option<String>,
}

/// Update child use case
pub struct UpdateChildUseCase<C>
where
    C: ChildrenRepository,
{
    repo: Arc<C>,
}

impl<C> UpdateChildUseCase<C>
where
    C: ChildrenRepository,
{
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    /// `bypass_ownership` is set for platform admins.
    pub async fn execute(
        &self,
        parent_id: UserId,
        child_id: ChildId,
        patch: ChildPatch,
        bypass_ownership: bool,
    ) -> ChildrenResult<Child> {
        let mut child = self
            .repo
            .find_by_id(&child_id)
            .await?
            .ok_or(ChildrenError::ChildNotFound)?;

        if !bypass_ownership {
            let link = self.repo.find_link(&parent_id, &child_id).await?;
            if link.is_none() {
                return Err(ChildrenError::Auth(AuthError::Forbidden));
            }
        }

        apply_patch(&mut child, patch)?;
        child.updated_at = Utc::now();
        self.repo.update(&child).await?;

        tracing::info!(child_id = %child.child_id, "Child updated");

        Ok(child)
    }
}

fn apply_patch(child: &mut Child, patch: ChildPatch) -> ChildrenResult<()> {
    if let Some(first_name) = patch.first_name {
        if first_name.trim().is_empty() {
            return Err(ChildrenError::Validation {
                index: 0,
                field: "first_name",
                message: "First name cannot be empty".to_string(),
            });
        }
        child.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = patch.last_name {
        if last_name.trim().is_empty() {
            return Err(ChildrenError::Validation {
                index: 0,
                field: "last_name",
                message: "Last name cannot be empty".to_string(),
            });
        }
        child.last_name = last_name.trim().to_string();
    }
    if let Some(dob) = patch.dob {
        if dob >= Utc::now().date_naive() {
            return Err(ChildrenError::Validation {
                index: 0,
                field: "dob",
                message: "Date of birth must be in the past".to_string(),
            });
        }
        child.dob = dob;
    }
    if let Some(gender) = patch.gender {
        child.gender = gender;
    }
    if let Some(grade) = patch.grade {
        if grade.trim().is_empty() {
            return Err(ChildrenError::Validation {
                index: 0,
                field: "grade",
                message: "Grade cannot be empty".to_string(),
            });
        }
        child.grade = grade.trim().to_string();
    }
    Ok(())
}
