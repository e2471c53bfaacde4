//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foldershare_core::types::{FileId, FolderId};

/// File metadata owned by a folder.
///
/// Content lives in object storage; this record only holds the opaque
/// locator handed back by the upload boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    #[serde(rename = "file_id")]
    pub id: FileId,
    /// The owning folder.
    pub folder_id: FolderId,
    /// The file name (including extension).
    #[serde(rename = "file_name")]
    pub name: String,
    /// File size in bytes.
    #[serde(rename = "file_size")]
    pub size: u64,
    /// Opaque object-storage locator.
    pub storage_locator: String,
    /// Username of the uploader.
    pub uploaded_by: String,
    /// When the upload was confirmed.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub uploaded_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }

    /// Case-insensitive substring match on the file name.
    pub fn name_matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}

/// File as produced to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    /// File ID.
    pub id: FileId,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Uploader username.
    pub uploaded_by: String,
    /// Upload time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub uploaded_at: DateTime<Utc>,
    /// Owning folder.
    pub folder_id: FolderId,
}

impl From<File> for FileSummary {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            name: file.name,
            size: file.size,
            uploaded_by: file.uploaded_by,
            uploaded_at: file.uploaded_at,
            folder_id: file.folder_id,
        }
    }
}
