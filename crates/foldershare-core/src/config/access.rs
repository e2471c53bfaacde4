//! Access engine configuration.

use serde::{Deserialize, Serialize};

/// Bounds for tree traversals (ancestor walks, descendant closures,
/// cascade deletes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Maximum number of levels any walk may visit.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}
