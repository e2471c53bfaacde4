//! File metadata repository implementation.

use std::sync::Arc;

use tracing::info;

use foldershare_core::error::{AppError, ErrorKind};
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{FileId, FolderId, Item, PutCondition};
use foldershare_entity::file::File;

use crate::keys;

/// Repository for file records owned by folders.
#[derive(Debug, Clone)]
pub struct FileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Find a file within a folder.
    pub async fn get(&self, folder_id: &FolderId, file_id: &FileId) -> AppResult<Option<File>> {
        self.store
            .get(&keys::file(folder_id, file_id))
            .await?
            .map(|item| item.decode())
            .transpose()
    }

    /// List the files in a folder, ordered by file id.
    pub async fn list_by_folder(&self, folder_id: &FolderId) -> AppResult<Vec<File>> {
        self.store
            .query(&keys::folder_partition(folder_id), Some(keys::FILE_PREFIX))
            .await?
            .iter()
            .map(Item::decode)
            .collect()
    }

    /// Record a file. Fails with `Conflict` if the id is already in use.
    pub async fn create(&self, file: &File) -> AppResult<()> {
        let item = Item::encode(
            keys::file(&file.folder_id, &file.id),
            Some(keys::file_index(&file.folder_id, &file.id)),
            file,
        )?;

        self.store
            .put(item, PutCondition::NotExists)
            .await
            .map_err(|e| {
                if e.is(ErrorKind::AlreadyExists) {
                    AppError::conflict(format!("File {} already exists", file.id))
                } else {
                    e
                }
            })?;

        info!(
            file_id = %file.id,
            folder_id = %file.folder_id,
            size = file.size,
            "File recorded"
        );
        Ok(())
    }

    /// Delete a file record. Deleting an absent record is a no-op.
    pub async fn delete(&self, folder_id: &FolderId, file_id: &FileId) -> AppResult<()> {
        self.store.delete(&keys::file(folder_id, file_id)).await
    }

    /// Every file record in the store.
    pub async fn scan_all(&self) -> AppResult<Vec<File>> {
        self.store
            .scan(Some(keys::FILE_PREFIX))
            .await?
            .iter()
            .map(Item::decode)
            .collect()
    }
}
