//! API DTOs (Data Transfer Objects)
//!
//! Wire format is snake_case JSON throughout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{child::Child, company::Company, link::ParentChildLink};
use crate::domain::value_object::gender::Gender;

// ============================================================================
// Bulk Onboard
// ============================================================================

/// One child record in the onboarding batch
#[derive(Debug, Clone, Deserialize)]
pub struct ChildInputDto {
    pub first_name: String,
    pub last_name: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub dob: NaiveDate,
    pub gender: Gender,
    pub grade: String,
}

/// Bulk onboard request
#[derive(Debug, Clone, Deserialize)]
pub struct BulkOnboardRequest {
    pub children: Vec<ChildInputDto>,
}

/// Bulk onboard response
#[derive(Debug, Clone, Serialize)]
pub struct BulkOnboardResponse {
    pub children: Vec<ChildDto>,
}

// ============================================================================
// Link
// ============================================================================

/// Link request
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRequest {
    pub unique_code: String,
}

/// Link response
#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub parent_id: Uuid,
    pub child_id: Uuid,
    pub linked_at: DateTime<Utc>,
}

impl From<&ParentChildLink> for LinkResponse {
    fn from(link: &ParentChildLink) -> Self {
        Self {
            parent_id: link.parent_id.into_uuid(),
            child_id: link.child_id.into_uuid(),
            linked_at: link.linked_at,
        }
    }
}

// ============================================================================
// Update
// ============================================================================

/// Child patch request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChildRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub grade: Option<String>,
}

// ============================================================================
// Common
// ============================================================================

/// Child representation in responses
#[derive(Debug, Clone, Serialize)]
pub struct ChildDto {
    pub child_id: Uuid,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub grade: String,
    /// Linking code; surfaced so admins can distribute it to parents
    pub unique_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Child> for ChildDto {
    fn from(child: &Child) -> Self {
        Self {
            child_id: child.child_id.into_uuid(),
            company_id: child.company_id.into_uuid(),
            first_name: child.first_name.clone(),
            last_name: child.last_name.clone(),
            dob: child.dob,
            gender: child.gender,
            grade: child.grade.clone(),
            unique_code: child.unique_code.as_str().to_string(),
            created_at: child.created_at,
        }
    }
}

/// Company representation in responses
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDto {
    pub company_id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self {
            company_id: company.company_id.into_uuid(),
            name: company.name.clone(),
            contact_email: company.contact_email.clone(),
            created_at: company.created_at,
        }
    }
}
