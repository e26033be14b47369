use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform role
///
/// Serialized as its snake_case code in JSON (access token claims, DTOs)
/// and as its numeric id in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Parent = 0,
    Driver = 1,
    CompanyAdmin = 2,
    PlatformAdmin = 3,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Parent => "parent",
            Driver => "driver",
            CompanyAdmin => "company_admin",
            PlatformAdmin => "platform_admin",
        }
    }

    /// Company-scoped roles must carry a company id
    #[inline]
    pub const fn requires_company(&self) -> bool {
        use UserRole::*;
        matches!(self, Driver | CompanyAdmin)
    }

    #[inline]
    pub const fn is_company_admin_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, CompanyAdmin | PlatformAdmin)
    }

    #[inline]
    pub const fn is_platform_admin(&self) -> bool {
        matches!(self, UserRole::PlatformAdmin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use UserRole::*;
        match id {
            0 => Parent,
            1 => Driver,
            2 => CompanyAdmin,
            3 => PlatformAdmin,
            _ => {
                tracing::error!("Invalid UserRole id: {}", id);
                unreachable!("Invalid UserRole id: {}", id)
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "parent" => Some(Parent),
            "driver" => Some(Driver),
            "company_admin" => Some(CompanyAdmin),
            "platform_admin" => Some(PlatformAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
