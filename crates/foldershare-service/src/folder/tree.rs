//! Folder tree views.
//!
//! Both views expand a set of starting folders into a flat map and then
//! rebuild the nesting from `parent_id` links. Neither view is
//! transactional: a structural change made while the walk is in progress
//! may or may not be reflected in the result.

use std::sync::Arc;

use tracing::debug;

use foldershare_auth::acl::{AccessChecker, FolderScope};
use foldershare_core::result::AppResult;
use foldershare_entity::folder::FolderTree;

/// Builds the full and the per-user folder trees.
#[derive(Debug, Clone)]
pub struct TreeService {
    scope: Arc<FolderScope>,
    checker: Arc<AccessChecker>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(scope: Arc<FolderScope>, checker: Arc<AccessChecker>) -> Self {
        Self { scope, checker }
    }

    /// Every folder, nested under the top-level folders.
    pub async fn build_full_tree(&self) -> AppResult<FolderTree> {
        let all = self.scope.everything().await?;
        let tree = FolderTree::from_flat(all.into_values());
        debug!(total = tree.total_folders, "Built full folder tree");
        Ok(tree)
    }

    /// The folders `username` can reach through assignments.
    ///
    /// Each assigned folder appears with all of its descendants. An
    /// assigned folder whose parent is not itself visible becomes a root
    /// of the view, so ancestors the user was never granted stay hidden.
    pub async fn build_filtered_tree(&self, username: &str) -> AppResult<FolderTree> {
        let assigned = self.checker.assigned_folder_ids(username).await?;
        if assigned.is_empty() {
            return Ok(FolderTree::empty());
        }

        let visible = self.scope.closure(&assigned).await?;
        let tree = FolderTree::from_flat(visible.into_values());
        debug!(
            username,
            assigned = assigned.len(),
            total = tree.total_folders,
            "Built filtered folder tree"
        );
        Ok(tree)
    }
}
