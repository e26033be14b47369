//! Child Entity

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ChildId, CompanyId};

use crate::domain::value_object::{gender::Gender, unique_code::UniqueCode};

/// Child demographic record created at bulk onboarding
#[derive(Debug, Clone)]
pub struct Child {
    /// Internal UUID identifier
    pub child_id: ChildId,
    /// Tenant that onboarded the child
    pub company_id: CompanyId,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth
    pub dob: NaiveDate,
    pub gender: Gender,
    /// School grade label (e.g. "3", "KG2")
    pub grade: String,
    /// One-time linking code, generated once at creation
    pub unique_code: UniqueCode,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Child {
    /// Create a new child with a freshly generated linking code
    pub fn new(
        company_id: CompanyId,
        first_name: String,
        last_name: String,
        dob: NaiveDate,
        gender: Gender,
        grade: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            child_id: ChildId::new(),
            company_id,
            first_name,
            last_name,
            dob,
            gender,
            grade,
            unique_code: UniqueCode::generate(),
            created_at: now,
            updated_at: now,
        }
    }
}
