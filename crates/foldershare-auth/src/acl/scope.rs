//! Descendant closures over the folder tree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{FolderId, ParentRef};
use foldershare_database::repositories::FolderRepository;
use foldershare_entity::folder::Folder;

/// Flat set of folders keyed by id.
pub type FolderMap = HashMap<FolderId, Folder>;

/// Expands folders into their descendant closures.
///
/// Traversal uses an explicit stack of `(folder, depth)` frames with a
/// visited set. A folder deeper than `max_depth` fails the expansion with
/// `Internal` instead of truncating the result.
#[derive(Debug, Clone)]
pub struct FolderScope {
    folders: Arc<FolderRepository>,
    max_depth: usize,
}

impl FolderScope {
    /// Creates a new scope expander.
    pub fn new(folders: Arc<FolderRepository>, max_depth: usize) -> Self {
        Self { folders, max_depth }
    }

    /// Every folder in the tree, discovered from the children of `ROOT`.
    pub async fn everything(&self) -> AppResult<FolderMap> {
        let tops = self.folders.list_children(&ParentRef::Root).await?;
        self.expand(tops.into_iter().map(|f| (f, 1)).collect()).await
    }

    /// The union of the closures of `roots`: each root plus every folder
    /// beneath it. Roots that no longer exist are ignored.
    pub async fn closure<'a>(
        &self,
        roots: impl IntoIterator<Item = &'a FolderId>,
    ) -> AppResult<FolderMap> {
        let mut start = Vec::new();
        for id in roots {
            match self.folders.get(id).await? {
                Some(folder) => start.push((folder, 1)),
                None => debug!(folder_id = %id, "Skipping missing scope root"),
            }
        }
        self.expand(start).await
    }

    /// The ids in the union of the closures of `roots`.
    pub async fn closure_ids<'a>(
        &self,
        roots: impl IntoIterator<Item = &'a FolderId>,
    ) -> AppResult<HashSet<FolderId>> {
        Ok(self.closure(roots).await?.into_keys().collect())
    }

    async fn expand(&self, start: Vec<(Folder, usize)>) -> AppResult<FolderMap> {
        let mut found = FolderMap::new();
        let mut stack = Vec::new();

        for (folder, depth) in start {
            if !found.contains_key(&folder.id) {
                stack.push((folder.id.clone(), depth));
                found.insert(folder.id.clone(), folder);
            }
        }

        while let Some((id, depth)) = stack.pop() {
            let children = self.folders.list_children(&ParentRef::Folder(id.clone())).await?;
            for child in children {
                if found.contains_key(&child.id) {
                    warn!(folder_id = %child.id, parent = %id, "Folder reached twice during expansion");
                    continue;
                }
                if depth + 1 > self.max_depth {
                    return Err(AppError::internal(format!(
                        "Folder tree below {id} exceeds the maximum depth of {}",
                        self.max_depth
                    )));
                }
                stack.push((child.id.clone(), depth + 1));
                found.insert(child.id.clone(), child);
            }
        }

        debug!(count = found.len(), "Expanded folder scope");
        Ok(found)
    }
}
