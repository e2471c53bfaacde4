//! Folder access checking by ancestor walk.
//!
//! A user may act on a folder when the folder itself or any of its
//! ancestors is directly assigned to them. Grants flow down the tree,
//! never up.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::FolderId;
use foldershare_database::repositories::{AssignmentRepository, FolderRepository};
use foldershare_entity::folder::Folder;
use foldershare_entity::user::UserRole;

/// Checks folder access against stored assignments.
#[derive(Debug, Clone)]
pub struct AccessChecker {
    folders: Arc<FolderRepository>,
    assignments: Arc<AssignmentRepository>,
    max_depth: usize,
}

impl AccessChecker {
    /// Creates a new access checker bounded to `max_depth` upward steps.
    pub fn new(
        folders: Arc<FolderRepository>,
        assignments: Arc<AssignmentRepository>,
        max_depth: usize,
    ) -> Self {
        Self {
            folders,
            assignments,
            max_depth,
        }
    }

    /// Deepest level a folder may sit at, counting top-level folders as 1.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The level of `folder_id`: 1 for a top-level folder, 0 for a
    /// missing one. Never reports more than the depth bound.
    pub async fn depth(&self, folder_id: &FolderId) -> AppResult<usize> {
        Ok(self.ancestry(folder_id).await?.len())
    }

    /// The folder ids directly assigned to `username`.
    pub async fn assigned_folder_ids(&self, username: &str) -> AppResult<HashSet<FolderId>> {
        self.assignments.assigned_folder_ids(username).await
    }

    /// Whether `username` may act on `folder_id` through an assignment on
    /// the folder or one of its ancestors.
    ///
    /// Role is not consulted: callers short-circuit Admin before asking.
    pub async fn has_access(&self, username: &str, folder_id: &FolderId) -> AppResult<bool> {
        let assigned = self.assigned_folder_ids(username).await?;
        let granted = self.has_access_within(&assigned, folder_id).await?;
        debug!(username, folder_id = %folder_id, granted, "Access check");
        Ok(granted)
    }

    /// Ancestor walk against an already-resolved assignment set.
    ///
    /// Ends with `false` at the top of the tree, on a missing folder, on a
    /// revisited folder, or when the depth bound is reached.
    pub async fn has_access_within(
        &self,
        assigned: &HashSet<FolderId>,
        folder_id: &FolderId,
    ) -> AppResult<bool> {
        if assigned.is_empty() {
            return Ok(false);
        }

        let mut visited = HashSet::new();
        let mut current = folder_id.clone();

        loop {
            if visited.len() >= self.max_depth {
                warn!(folder_id = %folder_id, max_depth = self.max_depth, "Ancestor walk hit depth bound");
                return Ok(false);
            }
            if !visited.insert(current.clone()) {
                warn!(folder_id = %folder_id, at = %current, "Cycle in parent chain");
                return Ok(false);
            }
            if assigned.contains(&current) {
                return Ok(true);
            }

            let Some(folder) = self.folders.get(&current).await? else {
                if current != *folder_id {
                    warn!(folder_id = %folder_id, missing = %current, "Dangling parent reference");
                }
                return Ok(false);
            };
            match folder.parent_id.folder_id() {
                Some(parent) => current = parent.clone(),
                None => return Ok(false),
            }
        }
    }

    /// Fail with `Forbidden` unless the caller may act on `folder_id`.
    /// Admin always passes.
    pub async fn require_access(
        &self,
        username: &str,
        role: UserRole,
        folder_id: &FolderId,
    ) -> AppResult<()> {
        if role.is_admin() || self.has_access(username, folder_id).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "User '{username}' has no access to folder {folder_id}"
            )))
        }
    }

    /// The chain from `folder_id` up to its top-level ancestor, starting
    /// with the folder itself.
    ///
    /// Stops early, returning what was collected so far, on a missing
    /// folder, a revisited folder, or the depth bound.
    pub async fn ancestry(&self, folder_id: &FolderId) -> AppResult<Vec<Folder>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(folder_id.clone());

        while let Some(current) = next.take() {
            if !visited.insert(current.clone()) {
                warn!(folder_id = %folder_id, at = %current, "Cycle in parent chain");
                break;
            }
            if chain.len() >= self.max_depth {
                warn!(folder_id = %folder_id, max_depth = self.max_depth, "Ancestor walk hit depth bound");
                break;
            }
            let Some(folder) = self.folders.get(&current).await? else {
                break;
            };
            next = folder.parent_id.folder_id().cloned();
            chain.push(folder);
        }

        Ok(chain)
    }

    /// Slash-separated path of folder names from the top of the tree down
    /// to `folder_id`, such as `/A/B`. An unknown folder yields `/`.
    pub async fn folder_path(&self, folder_id: &FolderId) -> AppResult<String> {
        let chain = self.ancestry(folder_id).await?;
        if chain.is_empty() {
            return Ok("/".to_string());
        }
        Ok(chain.iter().rev().fold(String::new(), |mut path, folder| {
            path.push('/');
            path.push_str(&folder.name);
            path
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldershare_core::error::ErrorKind;
    use foldershare_core::traits::KeyValueStore;
    use foldershare_core::types::ParentRef;
    use foldershare_database::MemoryStore;
    use foldershare_database::repositories::UserRepository;
    use foldershare_entity::user::User;

    struct Fixture {
        folders: Arc<FolderRepository>,
        assignments: Arc<AssignmentRepository>,
        checker: AccessChecker,
    }

    async fn fixture(max_depth: usize) -> Fixture {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let users = Arc::new(UserRepository::new(store.clone()));
        users.create(&User::new("u", UserRole::Reader)).await.unwrap();
        let folders = Arc::new(FolderRepository::new(store.clone()));
        let assignments = Arc::new(AssignmentRepository::new(store, users));
        let checker = AccessChecker::new(folders.clone(), assignments.clone(), max_depth);
        Fixture {
            folders,
            assignments,
            checker,
        }
    }

    #[tokio::test]
    async fn test_assignment_flows_down_not_up() {
        let fx = fixture(64).await;
        let a = fx.folders.create("A", ParentRef::Root).await.unwrap();
        let b = fx.folders.create("B", a.id.clone().into()).await.unwrap();
        let d = fx.folders.create("D", b.id.clone().into()).await.unwrap();
        let other = fx.folders.create("Other", ParentRef::Root).await.unwrap();

        fx.assignments
            .assign(&b.id, &["u".to_string()])
            .await
            .unwrap();

        assert!(fx.checker.has_access("u", &b.id).await.unwrap());
        assert!(fx.checker.has_access("u", &d.id).await.unwrap());
        assert!(!fx.checker.has_access("u", &a.id).await.unwrap());
        assert!(!fx.checker.has_access("u", &other.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_no_assignments_means_no_access() {
        let fx = fixture(64).await;
        let a = fx.folders.create("A", ParentRef::Root).await.unwrap();
        assert!(!fx.checker.has_access("u", &a.id).await.unwrap());

        let err = fx
            .checker
            .require_access("u", UserRole::Reader, &a.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        fx.checker
            .require_access("root", UserRole::Admin, &a.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_depth_bound_denies() {
        let fx = fixture(2).await;
        let a = fx.folders.create("A", ParentRef::Root).await.unwrap();
        let b = fx.folders.create("B", a.id.clone().into()).await.unwrap();
        let c = fx.folders.create("C", b.id.clone().into()).await.unwrap();
        fx.assignments
            .assign(&a.id, &["u".to_string()])
            .await
            .unwrap();

        assert!(fx.checker.has_access("u", &b.id).await.unwrap());
        assert!(!fx.checker.has_access("u", &c.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_folder_path() {
        let fx = fixture(64).await;
        let a = fx.folders.create("A", ParentRef::Root).await.unwrap();
        let b = fx.folders.create("B", a.id.clone().into()).await.unwrap();

        assert_eq!(fx.checker.folder_path(&b.id).await.unwrap(), "/A/B");
        assert_eq!(fx.checker.folder_path(&a.id).await.unwrap(), "/A");
        assert_eq!(
            fx.checker
                .folder_path(&"gone0000".parse().unwrap())
                .await
                .unwrap(),
            "/"
        );
    }
}
