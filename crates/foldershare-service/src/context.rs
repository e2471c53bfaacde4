//! Request context carrying the caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foldershare_entity::user::UserRole;

/// The resolved caller of an operation.
///
/// Credentials are verified before a context is built; services trust
/// `username` and `role` as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's username.
    pub username: String,
    /// The caller's role.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            username: username.into(),
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
