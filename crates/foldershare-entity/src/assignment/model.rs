//! Assignment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foldershare_core::types::FolderId;

/// A grant of one folder (and, implicitly, everything beneath it) to one
/// user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// The assigned folder.
    pub folder_id: FolderId,
    /// The user receiving access.
    pub username: String,
    /// When the assignment was (last) written.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    /// Create an assignment stamped with the current time.
    pub fn new(folder_id: FolderId, username: impl Into<String>) -> Self {
        Self {
            folder_id,
            username: username.into(),
            assigned_at: Utc::now(),
        }
    }
}

/// Assignment as listed for a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// The assigned user.
    pub username: String,
    /// When the assignment was written.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub assigned_at: DateTime<Utc>,
}

impl From<Assignment> for AssignmentRecord {
    fn from(assignment: Assignment) -> Self {
        Self {
            username: assignment.username,
            assigned_at: assignment.assigned_at,
        }
    }
}
