//! Assignment repository implementation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{FolderId, Item, ItemKey, PutCondition};
use foldershare_entity::assignment::Assignment;

use crate::keys;
use crate::repositories::user::UserRepository;

/// Repository for (folder, user) grants.
///
/// Each grant is one item in the folder's partition, indexed under the
/// user so it resolves from either side.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    store: Arc<dyn KeyValueStore>,
    users: Arc<UserRepository>,
}

impl AssignmentRepository {
    /// Create a new assignment repository.
    pub fn new(store: Arc<dyn KeyValueStore>, users: Arc<UserRepository>) -> Self {
        Self { store, users }
    }

    /// Assign `usernames` to a folder.
    ///
    /// Unknown users are skipped without error. Re-assigning an existing
    /// grant overwrites its timestamp. Returns the grants that were written.
    pub async fn assign(
        &self,
        folder_id: &FolderId,
        usernames: &[String],
    ) -> AppResult<Vec<Assignment>> {
        let mut written = Vec::with_capacity(usernames.len());

        for username in usernames {
            if !self.users.exists(username).await? {
                debug!(folder_id = %folder_id, username, "Skipping unknown user");
                continue;
            }

            let assignment = Assignment::new(folder_id.clone(), username.clone());
            let item = Item::encode(
                keys::assignment(folder_id, username),
                Some(keys::assignment_index(folder_id, username)),
                &assignment,
            )?;
            self.store.put(item, PutCondition::Always).await?;
            written.push(assignment);
        }

        info!(
            folder_id = %folder_id,
            requested = usernames.len(),
            assigned = written.len(),
            "Users assigned to folder"
        );
        Ok(written)
    }

    /// Remove one grant. Fails with `NotFound` if it does not exist.
    pub async fn unassign(&self, folder_id: &FolderId, username: &str) -> AppResult<()> {
        let key = keys::assignment(folder_id, username);
        if self.store.get(&key).await?.is_none() {
            return Err(AppError::not_found(format!(
                "User '{username}' is not assigned to folder {folder_id}"
            )));
        }

        self.store.delete(&key).await?;
        info!(folder_id = %folder_id, username, "User unassigned from folder");
        Ok(())
    }

    /// List the grants on a folder, ordered by username.
    pub async fn list_by_folder(&self, folder_id: &FolderId) -> AppResult<Vec<Assignment>> {
        self.store
            .query(&keys::folder_partition(folder_id), Some(keys::ASSIGN_PREFIX))
            .await?
            .iter()
            .map(Item::decode)
            .collect()
    }

    /// List the grants held by a user.
    pub async fn list_by_user(&self, username: &str) -> AppResult<Vec<Assignment>> {
        self.store
            .query_index(
                &keys::user_partition(username),
                Some(keys::USER_ASSIGNMENT_PREFIX),
            )
            .await?
            .iter()
            .map(Item::decode)
            .collect()
    }

    /// The ids of the folders directly assigned to a user.
    pub async fn assigned_folder_ids(&self, username: &str) -> AppResult<HashSet<FolderId>> {
        Ok(self
            .list_by_user(username)
            .await?
            .into_iter()
            .map(|a| a.folder_id)
            .collect())
    }

    /// Primary keys of every grant held by a user.
    pub async fn keys_for_user(&self, username: &str) -> AppResult<Vec<ItemKey>> {
        Ok(self
            .list_by_user(username)
            .await?
            .iter()
            .map(|a| keys::assignment(&a.folder_id, &a.username))
            .collect())
    }
}
