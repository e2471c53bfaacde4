//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foldershare_core::types::{FolderId, ParentRef};

/// A folder in the hierarchy.
///
/// Children are not stored inline; they are discovered through the
/// secondary index keyed by `parent_id`. `parent_id` never changes after
/// creation, which is what keeps the parent chain acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    #[serde(rename = "folder_id")]
    pub id: FolderId,
    /// Folder name, unique among siblings.
    pub name: String,
    /// Parent folder, or `ROOT` for top-level folders.
    pub parent_id: ParentRef,
    /// When the folder was created.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Create a new folder record with a fresh identifier.
    pub fn new(name: impl Into<String>, parent_id: ParentRef) -> Self {
        Self {
            id: FolderId::generate(),
            name: name.into(),
            parent_id,
            created_at: Utc::now(),
        }
    }

    /// Check if this is a top-level folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_shape() {
        let folder = Folder::new("Reports", ParentRef::Root);
        let value = serde_json::to_value(&folder).unwrap();
        assert_eq!(value["parent_id"], "ROOT");
        assert_eq!(value["folder_id"], folder.id.as_str());
        assert!(value["created_at"].is_i64());
        assert!(folder.is_root());
    }
}
