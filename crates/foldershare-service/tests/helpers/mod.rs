//! Shared helpers for service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use foldershare_core::config::AppConfig;
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{FolderId, Item, ItemKey, ParentRef, PutCondition};
use foldershare_database::MemoryStore;
use foldershare_database::keys;
use foldershare_entity::file::File;
use foldershare_entity::folder::Folder;
use foldershare_entity::user::UserRole;
use foldershare_service::ServiceContainer;
use foldershare_service::RequestContext;
use foldershare_service::assignment::AssignUsersRequest;
use foldershare_service::file::{ConfirmUploadRequest, UploadRequest};
use foldershare_service::folder::CreateFolderRequest;
use foldershare_service::user::CreateUserRequest;

/// Test application context.
pub struct TestApp {
    /// Every service, wired onto the test store.
    pub services: ServiceContainer,
    /// The bootstrap administrator.
    pub admin: RequestContext,
}

impl TestApp {
    /// Create a test application over a fresh in-memory store.
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }

    /// Create a test application over the given store.
    pub async fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, AppConfig::default()).await
    }

    /// Create a test application with custom configuration.
    pub async fn with_config(store: Arc<dyn KeyValueStore>, config: AppConfig) -> Self {
        let services = ServiceContainer::new(store, &config);
        let admin = RequestContext::new("admin", UserRole::Admin);
        Self { services, admin }
    }

    /// Create a user profile and return a context acting as that user.
    pub async fn create_user(&self, username: &str, role: UserRole) -> RequestContext {
        self.services
            .users
            .create_user(
                &self.admin,
                CreateUserRequest {
                    username: username.to_string(),
                    role,
                },
            )
            .await
            .expect("Failed to create user");
        RequestContext::new(username, role)
    }

    /// Create a folder as admin.
    pub async fn folder(&self, name: &str, parent: Option<&FolderId>) -> Folder {
        self.services
            .folders
            .create_folder(
                &self.admin,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id: parent.cloned(),
                },
            )
            .await
            .expect("Failed to create folder")
    }

    /// Assign a user to a folder as admin.
    pub async fn assign(&self, folder: &FolderId, username: &str) {
        self.services
            .assignments
            .assign_users(
                &self.admin,
                folder,
                AssignUsersRequest {
                    usernames: vec![username.to_string()],
                },
            )
            .await
            .expect("Failed to assign user");
    }

    /// Upload a file through prepare and confirm.
    pub async fn upload(&self, ctx: &RequestContext, folder: &FolderId, name: &str) -> File {
        let ticket = self
            .services
            .files
            .prepare_upload(
                ctx,
                UploadRequest {
                    folder_id: folder.clone(),
                    file_name: name.to_string(),
                    file_size: 128,
                },
            )
            .await
            .expect("Failed to prepare upload");

        self.services
            .files
            .confirm_upload(
                ctx,
                ConfirmUploadRequest {
                    file_id: ticket.file_id,
                    folder_id: ticket.folder_id,
                    file_name: name.to_string(),
                    file_size: 128,
                    storage_locator: ticket.storage_locator,
                },
            )
            .await
            .expect("Failed to confirm upload")
    }

    /// Whether `username` has access to `folder`.
    pub async fn has_access(&self, username: &str, folder: &FolderId) -> bool {
        self.services
            .checker
            .has_access(username, folder)
            .await
            .expect("Access check failed")
    }
}

/// Tree `Root → A → {B, C}` with user `u` (Reader) assigned to `A`.
pub struct Scenario {
    pub app: TestApp,
    pub u: RequestContext,
    pub a: Folder,
    pub b: Folder,
    pub c: Folder,
}

impl Scenario {
    pub async fn new() -> Self {
        Self::on(TestApp::new().await).await
    }

    pub async fn on(app: TestApp) -> Self {
        let u = app.create_user("u", UserRole::Reader).await;
        let a = app.folder("A", None).await;
        let b = app.folder("B", Some(&a.id)).await;
        let c = app.folder("C", Some(&a.id)).await;
        app.assign(&a.id, "u").await;
        Self { app, u, a, b, c }
    }
}

/// Build the stored item of a folder, bypassing the repository checks.
pub fn folder_item(name: &str, parent: impl Into<ParentRef>) -> (Folder, Item) {
    let folder = Folder::new(name, parent.into());
    let item = folder_record(&folder);
    (folder, item)
}

/// Encode an existing folder record as it is stored.
pub fn folder_record(folder: &Folder) -> Item {
    Item::encode(
        keys::folder_meta(&folder.id),
        Some(keys::folder_index(&folder.parent_id, &folder.id)),
        folder,
    )
    .expect("Failed to encode folder")
}

/// Write two folders `X` and `Y` that name each other as parent.
pub async fn parent_cycle(store: &dyn KeyValueStore) -> (Folder, Folder) {
    let (mut x, _) = folder_item("X", ParentRef::Root);
    let (y, y_item) = folder_item("Y", x.id.clone());
    x.parent_id = ParentRef::Folder(y.id.clone());

    store
        .put(folder_record(&x), PutCondition::Always)
        .await
        .expect("Failed to write folder");
    store
        .put(y_item, PutCondition::Always)
        .await
        .expect("Failed to write folder");
    (x, y)
}

/// A write injected by [`InterleavingStore`].
#[derive(Debug)]
pub enum Injected {
    Put(Item),
    Delete(ItemKey),
}

/// Store wrapper that applies writes in the middle of a traversal.
///
/// Each injection is armed on a secondary partition. The first index
/// query against that partition returns what the inner store held at the
/// time of the query, and the write is applied right after, so the rest
/// of the walk observes it.
#[derive(Debug, Default)]
pub struct InterleavingStore {
    inner: MemoryStore,
    armed: Mutex<Vec<(String, Injected)>>,
}

impl InterleavingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `write` right after the next index query on `gsi1pk`.
    pub fn arm(&self, gsi1pk: impl Into<String>, write: Injected) {
        self.armed
            .lock()
            .expect("armed lock poisoned")
            .push((gsi1pk.into(), write));
    }

    /// Number of injections still waiting for their trigger.
    pub fn pending(&self) -> usize {
        self.armed.lock().expect("armed lock poisoned").len()
    }

    async fn fire(&self, gsi1pk: &str) -> AppResult<()> {
        let due: Vec<Injected> = {
            let mut armed = self.armed.lock().expect("armed lock poisoned");
            let (due, keep): (Vec<_>, Vec<_>) =
                armed.drain(..).partition(|(trigger, _)| trigger == gsi1pk);
            *armed = keep;
            due.into_iter().map(|(_, write)| write).collect()
        };

        for write in due {
            match write {
                Injected::Put(item) => self.inner.put(item, PutCondition::Always).await?,
                Injected::Delete(key) => self.inner.delete(&key).await?,
            }
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InterleavingStore {
    fn provider_type(&self) -> &str {
        "interleaving"
    }

    async fn get(&self, key: &ItemKey) -> AppResult<Option<Item>> {
        self.inner.get(key).await
    }

    async fn put(&self, item: Item, condition: PutCondition) -> AppResult<()> {
        self.inner.put(item, condition).await
    }

    async fn delete(&self, key: &ItemKey) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> AppResult<Vec<Item>> {
        self.inner.query(pk, sk_prefix).await
    }

    async fn query_index(
        &self,
        gsi1pk: &str,
        gsi1sk_prefix: Option<&str>,
    ) -> AppResult<Vec<Item>> {
        let found = self.inner.query_index(gsi1pk, gsi1sk_prefix).await?;
        self.fire(gsi1pk).await?;
        Ok(found)
    }

    async fn scan(&self, sk_prefix: Option<&str>) -> AppResult<Vec<Item>> {
        self.inner.scan(sk_prefix).await
    }

    async fn batch_delete(&self, keys: &[ItemKey]) -> AppResult<()> {
        self.inner.batch_delete(keys).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
