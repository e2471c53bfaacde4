//! Folder repository implementation.
//!
//! Folders are stored as adjacency-list records: each folder's meta item
//! carries its parent in the secondary index, so listing children is a
//! single index query keyed by the parent id.

use std::sync::Arc;

use tracing::{debug, info, warn};

use foldershare_core::error::{AppError, ErrorKind};
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{FolderId, Item, ItemKey, ParentRef, PutCondition};
use foldershare_entity::folder::Folder;

use crate::keys;

/// Attempts at drawing a fresh folder id before giving up.
const CREATE_ATTEMPTS: usize = 3;

/// Repository for folder CRUD and parent/child linkage.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Find a folder by ID.
    pub async fn get(&self, id: &FolderId) -> AppResult<Option<Folder>> {
        self.store
            .get(&keys::folder_meta(id))
            .await?
            .map(|item| item.decode())
            .transpose()
    }

    /// Find a folder by ID, failing with `NotFound` if it is absent.
    pub async fn require(&self, id: &FolderId) -> AppResult<Folder> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Check whether a folder exists.
    pub async fn exists(&self, id: &FolderId) -> AppResult<bool> {
        Ok(self.store.get(&keys::folder_meta(id)).await?.is_some())
    }

    /// List the direct children of `parent`.
    pub async fn list_children(&self, parent: &ParentRef) -> AppResult<Vec<Folder>> {
        let items = self
            .store
            .query_index(&keys::children_partition(parent), Some(keys::FOLDER_PREFIX))
            .await?;

        let children = items
            .iter()
            .filter(|item| item.key.sk == keys::META)
            .map(Item::decode::<Folder>)
            .collect::<AppResult<Vec<_>>>()?;

        debug!(parent = %parent, count = children.len(), "Listed child folders");
        Ok(children)
    }

    /// Create a folder under `parent`.
    ///
    /// Fails with `NotFound` when the parent folder does not exist and with
    /// `Conflict` when a sibling already uses `name`. The sibling check is a
    /// read followed by a write: two concurrent creates of the same name
    /// under the same parent can both succeed.
    pub async fn create(&self, name: &str, parent: ParentRef) -> AppResult<Folder> {
        if let Some(parent_id) = parent.folder_id() {
            if !self.exists(parent_id).await? {
                return Err(AppError::not_found(format!(
                    "Parent folder {parent_id} not found"
                )));
            }
        }

        let siblings = self.list_children(&parent).await?;
        if siblings.iter().any(|f| f.name == name) {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }

        for _ in 0..CREATE_ATTEMPTS {
            let folder = Folder::new(name, parent.clone());
            let item = Item::encode(
                keys::folder_meta(&folder.id),
                Some(keys::folder_index(&parent, &folder.id)),
                &folder,
            )?;

            match self.store.put(item, PutCondition::NotExists).await {
                Ok(()) => {
                    info!(folder_id = %folder.id, parent = %parent, name, "Folder created");
                    return Ok(folder);
                }
                Err(e) if e.is(ErrorKind::AlreadyExists) => {
                    warn!(folder_id = %folder.id, "Folder id collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal("Could not allocate a unique folder id"))
    }

    /// Rename a folder in place.
    ///
    /// Fails with `NotFound` if the folder is absent (including when it is
    /// deleted between the read and the write) and with `Conflict` if a
    /// different sibling already uses `new_name`. The parent linkage is not
    /// touched.
    pub async fn rename(&self, id: &FolderId, new_name: &str) -> AppResult<Folder> {
        let mut folder = self.require(id).await?;

        let siblings = self.list_children(&folder.parent_id).await?;
        if siblings
            .iter()
            .any(|f| f.id != folder.id && f.name == new_name)
        {
            return Err(AppError::conflict(format!(
                "A folder named '{new_name}' already exists here"
            )));
        }

        folder.name = new_name.to_string();
        let item = Item::encode(
            keys::folder_meta(&folder.id),
            Some(keys::folder_index(&folder.parent_id, &folder.id)),
            &folder,
        )?;

        self.store
            .put(item, PutCondition::Exists)
            .await
            .map_err(|e| {
                if e.is(ErrorKind::ConditionFailed) {
                    AppError::not_found(format!("Folder {id} not found"))
                } else {
                    e
                }
            })?;

        info!(folder_id = %id, name = new_name, "Folder renamed");
        Ok(folder)
    }

    /// Every item stored in the folder's partition: the meta record, its
    /// assignments, and its files.
    pub async fn owned_items(&self, id: &FolderId) -> AppResult<Vec<Item>> {
        self.store.query(&keys::folder_partition(id), None).await
    }

    /// Delete a batch of keys in one call.
    pub async fn delete_keys(&self, keys: &[ItemKey]) -> AppResult<()> {
        self.store.batch_delete(keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> FolderRepository {
        FolderRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_under_missing_parent() {
        let folders = repo();
        let err = folders
            .create("Docs", ParentRef::Folder("missing1".parse().unwrap()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_sibling_names_are_unique() {
        let folders = repo();
        let a = folders.create("A", ParentRef::Root).await.unwrap();
        folders.create("Docs", a.id.clone().into()).await.unwrap();

        let err = folders
            .create("Docs", a.id.clone().into())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Same name under a different parent is fine.
        folders.create("Docs", ParentRef::Root).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_rules() {
        let folders = repo();
        let a = folders.create("A", ParentRef::Root).await.unwrap();
        let b = folders.create("B", a.id.clone().into()).await.unwrap();
        folders.create("C", a.id.clone().into()).await.unwrap();
        folders.create("X", ParentRef::Root).await.unwrap();

        let err = folders.rename(&b.id, "C").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let renamed = folders.rename(&b.id, "X").await.unwrap();
        assert_eq!(renamed.name, "X");
        assert_eq!(renamed.parent_id, ParentRef::Folder(a.id.clone()));

        // Renaming to its own name is not a conflict.
        folders.rename(&b.id, "X").await.unwrap();

        let children = folders.list_children(&a.id.into()).await.unwrap();
        let mut names: Vec<&str> = children.iter().map(|f| f.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["C", "X"]);
    }

    #[tokio::test]
    async fn test_rename_missing_folder() {
        let folders = repo();
        let err = folders
            .rename(&"nope0000".parse().unwrap(), "Y")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
