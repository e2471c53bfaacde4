//! User profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::UserRole;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// The account may sign in.
    #[default]
    Active,
    /// The account is locked out.
    Disabled,
}

/// A user profile. Credentials are held by the identity collaborator,
/// not here; this record only anchors existence and role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique username.
    pub username: String,
    /// Assigned role.
    pub role: UserRole,
    /// Account status.
    #[serde(default)]
    pub status: UserStatus,
    /// When the profile was created.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create an active user stamped with the current time.
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            username: username.into(),
            role,
            status: UserStatus::Active,
            created_at: Utc::now(),
        }
    }
}
