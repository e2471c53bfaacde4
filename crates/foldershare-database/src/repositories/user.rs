//! User profile repository implementation.

use std::sync::Arc;

use tracing::info;

use foldershare_core::error::{AppError, ErrorKind};
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{Item, ItemKey, PutCondition};
use foldershare_entity::user::{User, UserRole};

use crate::keys;

/// Repository for user profiles.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Arc<dyn KeyValueStore>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Find a user by username.
    pub async fn get(&self, username: &str) -> AppResult<Option<User>> {
        self.store
            .get(&keys::user_profile(username))
            .await?
            .map(|item| item.decode())
            .transpose()
    }

    /// Check whether a profile exists for `username`.
    pub async fn exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.store.get(&keys::user_profile(username)).await?.is_some())
    }

    /// Create a profile. Fails with `Conflict` if the username is taken.
    pub async fn create(&self, user: &User) -> AppResult<()> {
        let item = Item::encode(
            keys::user_profile(&user.username),
            Some(keys::user_index(user.role, &user.username)),
            user,
        )?;

        self.store
            .put(item, PutCondition::NotExists)
            .await
            .map_err(|e| {
                if e.is(ErrorKind::AlreadyExists) {
                    AppError::conflict(format!("User '{}' already exists", user.username))
                } else {
                    e
                }
            })?;

        info!(username = %user.username, role = %user.role, "User profile created");
        Ok(())
    }

    /// Delete a profile together with `owned` keys in one batch.
    pub async fn delete_with(&self, username: &str, owned: Vec<ItemKey>) -> AppResult<()> {
        let mut doomed = owned;
        doomed.push(keys::user_profile(username));
        self.store.batch_delete(&doomed).await?;

        info!(username, removed = doomed.len(), "User profile deleted");
        Ok(())
    }

    /// List profiles, optionally restricted to one role, ordered by username.
    pub async fn list(&self, role: Option<UserRole>) -> AppResult<Vec<User>> {
        let items = match role {
            Some(role) => {
                self.store
                    .query_index(&keys::role_partition(role), Some(keys::USER_PREFIX))
                    .await?
            }
            None => self.store.scan(Some(keys::PROFILE)).await?,
        };

        let mut users = items
            .iter()
            .filter(|item| item.key.pk.starts_with(keys::USER_PREFIX))
            .map(Item::decode::<User>)
            .collect::<AppResult<Vec<_>>>()?;
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let users = repo();
        users.create(&User::new("amy", UserRole::Reader)).await.unwrap();

        let err = users
            .create(&User::new("amy", UserRole::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let stored = users.get("amy").await.unwrap().unwrap();
        assert_eq!(stored.role, UserRole::Reader);
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let users = repo();
        users.create(&User::new("zoe", UserRole::Reader)).await.unwrap();
        users.create(&User::new("bob", UserRole::Uploader)).await.unwrap();
        users.create(&User::new("amy", UserRole::Reader)).await.unwrap();

        let readers: Vec<String> = users
            .list(Some(UserRole::Reader))
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(readers, vec!["amy", "zoe"]);
        assert_eq!(users.list(None).await.unwrap().len(), 3);

        users.delete_with("zoe", Vec::new()).await.unwrap();
        assert!(!users.exists("zoe").await.unwrap());
    }
}
