//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
///
/// Admin manages folders, users, and assignments and sees every folder.
/// The other roles only see folders reachable from their assignments and
/// differ in what they may do with files there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Full administrator.
    Admin,
    /// Can upload files and delete their own uploads.
    Uploader,
    /// Can download files.
    Reader,
    /// Can browse folders and file listings only.
    Viewer,
}

impl UserRole {
    /// Every role, most privileged first.
    pub const ALL: [UserRole; 4] = [Self::Admin, Self::Uploader, Self::Reader, Self::Viewer];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Uploader => "Uploader",
            Self::Reader => "Reader",
            Self::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = foldershare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "uploader" => Ok(Self::Uploader),
            "reader" => Ok(Self::Reader),
            "viewer" => Ok(Self::Viewer),
            _ => Err(foldershare_core::AppError::invalid_input(format!(
                "Invalid user role: '{s}'. Expected one of: Admin, Uploader, Reader, Viewer"
            ))),
        }
    }
}
