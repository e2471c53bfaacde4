//! File metadata configuration.

use serde::{Deserialize, Serialize};

/// Limits and naming for file records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Leading path segment of every storage locator.
    #[serde(default = "default_locator_prefix")]
    pub locator_prefix: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            locator_prefix: default_locator_prefix(),
        }
    }
}

fn default_max_file_size() -> u64 {
    1024 * 1024 * 1024
}

fn default_locator_prefix() -> String {
    "files".to_string()
}
