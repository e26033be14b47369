//! Bulk Onboard Use Case
//!
//! Creates a batch of child records for a company, each with a freshly
//! generated linking code. The whole batch is validated up front; the
//! first invalid record aborts everything and nothing is persisted.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use kernel::id::CompanyId;

use crate::domain::entity::child::Child;
use crate::domain::repository::ChildrenRepository;
use crate::domain::value_object::gender::Gender;
use crate::error::{ChildrenError, ChildrenResult};

/// One record of the onboarding batch
#[derive(Debug, Clone)]
pub struct ChildInput {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub grade: String,
}

/// How many times a batch is rebuilt when a generated code collides
const CODE_RETRY_LIMIT: usize = 3;

/// Bulk onboard use case
pub struct BulkOnboardUseCase<C>
where
    C: ChildrenRepository,
{
    repo: Arc<C>,
}

impl<C> BulkOnboardUseCase<C>
where
    C: ChildrenRepository,
{
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        company_id: CompanyId,
        inputs: Vec<ChildInput>,
    ) -> ChildrenResult<Vec<Child>> {
        if inputs.is_empty() {
            return Err(ChildrenError::Validation {
                index: 0,
                field: "children",
                message: "Batch cannot be empty".to_string(),
            });
        }

        // Validate the entire batch before creating anything
        for (index, input) in inputs.iter().enumerate() {
            validate_input(index, input)?;
        }

        // Codes are random; on the rare duplicate the batch is rebuilt
        // with fresh codes and retried
        for attempt in 1..=CODE_RETRY_LIMIT {
            let children: Vec<Child> = inputs
                .iter()
                .map(|input| {
                    Child::new(
                        company_id,
                        input.first_name.trim().to_string(),
                        input.last_name.trim().to_string(),
                        input.dob,
                        input.gender,
                        input.grade.trim().to_string(),
                    )
                })
                .collect();

            match self.repo.create_batch(&children).await {
                Ok(()) => {
                    tracing::info!(
                        company_id = %company_id,
                        count = children.len(),
                        "Children onboarded"
                    );
                    return Ok(children);
                }
                Err(ChildrenError::CodeCollision) => {
                    tracing::warn!(attempt, "Linking code collision, regenerating batch");
                }
                Err(e) => return Err(e),
            }
        }

        Err(ChildrenError::Internal(
            "Could not allocate unique linking codes".to_string(),
        ))
    }
}

fn validate_input(index: usize, input: &ChildInput) -> ChildrenResult<()> {
    if input.first_name.trim().is_empty() {
        return Err(ChildrenError::Validation {
            index,
            field: "first_name",
            message: "First name cannot be empty".to_string(),
        });
    }
    if input.last_name.trim().is_empty() {
        return Err(ChildrenError::Validation {
            index,
            field: "last_name",
            message: "Last name cannot be empty".to_string(),
        });
    }
    if input.grade.trim().is_empty() {
        return Err(ChildrenError::Validation {
            index,
            field: "grade",
            message: "Grade cannot be empty".to_string(),
        });
    }
    if input.dob >= Utc::now().date_naive() {
        return Err(ChildrenError::Validation {
            index,
            field: "dob",
            message: "Date of birth must be in the past".to_string(),
        });
    }
    Ok(())
}
