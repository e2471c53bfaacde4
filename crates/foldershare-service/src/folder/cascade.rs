//! Cascading folder deletion.
//!
//! A subtree is walked depth-first with an explicit stack. Each folder's
//! partition (files, assignments, meta) is collected after all of its
//! descendants, so the collected keys are ordered children before parents
//! and the root's meta record comes last. Everything is then removed in a
//! single batch delete, which the store may split into chunks.
//!
//! There is no rollback. If the batch fails partway, the root and some
//! descendants may remain; running the deletion again finishes the job.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{FolderId, ItemKey, ParentRef};
use foldershare_database::keys;
use foldershare_database::repositories::FolderRepository;
use foldershare_entity::file::File;

/// What a subtree deletion removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtreeDeletion {
    /// Folder records removed, the root included.
    pub folders: usize,
    /// Assignment records removed.
    pub assignments: usize,
    /// File records removed. Their storage locators are handed back so
    /// the caller can delete the stored objects.
    pub files: Vec<File>,
}

/// Deletes folder subtrees and everything they own.
#[derive(Debug, Clone)]
pub struct CascadeCoordinator {
    folders: Arc<FolderRepository>,
    max_depth: usize,
}

/// Stack frame of the post-order walk.
struct Frame {
    id: FolderId,
    depth: usize,
    expanded: bool,
}

impl CascadeCoordinator {
    /// Creates a new coordinator bounded to `max_depth` levels below the
    /// deleted folder.
    pub fn new(folders: Arc<FolderRepository>, max_depth: usize) -> Self {
        Self { folders, max_depth }
    }

    /// Delete `folder_id`, its descendants, and their files and
    /// assignments. Fails with `NotFound` if the folder does not exist.
    pub async fn delete_subtree(&self, folder_id: &FolderId) -> AppResult<SubtreeDeletion> {
        self.folders.require(folder_id).await?;

        let mut report = SubtreeDeletion::default();
        let mut doomed: Vec<ItemKey> = Vec::new();
        let mut visited = HashSet::from([folder_id.clone()]);
        let mut stack = vec![Frame {
            id: folder_id.clone(),
            depth: 0,
            expanded: false,
        }];

        while let Some(frame) = stack.pop() {
            if frame.expanded {
                self.collect_partition(&frame.id, &mut doomed, &mut report)
                    .await?;
                continue;
            }

            let children = self
                .folders
                .list_children(&ParentRef::Folder(frame.id.clone()))
                .await?;
            let depth = frame.depth + 1;
            stack.push(Frame {
                expanded: true,
                ..frame
            });

            for child in children {
                if !visited.insert(child.id.clone()) {
                    warn!(folder_id = %child.id, "Folder reached twice during cascade");
                    continue;
                }
                if depth > self.max_depth {
                    return Err(AppError::internal(format!(
                        "Folder tree below {folder_id} exceeds the maximum depth of {}",
                        self.max_depth
                    )));
                }
                stack.push(Frame {
                    id: child.id,
                    depth,
                    expanded: false,
                });
            }
        }

        self.folders.delete_keys(&doomed).await?;

        info!(
            folder_id = %folder_id,
            folders = report.folders,
            files = report.files.len(),
            assignments = report.assignments,
            "Folder subtree deleted"
        );
        Ok(report)
    }

    async fn collect_partition(
        &self,
        id: &FolderId,
        doomed: &mut Vec<ItemKey>,
        report: &mut SubtreeDeletion,
    ) -> AppResult<()> {
        let mut meta = None;

        for item in self.folders.owned_items(id).await? {
            if item.key.sk == keys::META {
                meta = Some(item.key);
                continue;
            }
            if item.key.sk.starts_with(keys::FILE_PREFIX) {
                report.files.push(item.decode()?);
            } else if item.key.sk.starts_with(keys::ASSIGN_PREFIX) {
                report.assignments += 1;
            }
            doomed.push(item.key);
        }

        if let Some(meta) = meta {
            report.folders += 1;
            doomed.push(meta);
        }
        Ok(())
    }
}
