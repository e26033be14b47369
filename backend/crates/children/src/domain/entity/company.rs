//! Company Entity

use chrono::{DateTime, Utc};
use kernel::id::CompanyId;

/// Transport company (tenant)
#[derive(Debug, Clone)]
pub struct Company {
    pub company_id: CompanyId,
    pub name: String,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
