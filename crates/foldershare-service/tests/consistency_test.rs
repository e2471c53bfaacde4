//! Tree walks are not transactional.
//!
//! These tests apply writes while a walk is in progress and pin down what
//! the caller observes: a mix of before and after state, never an error.

mod helpers;

use std::sync::Arc;

use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::ParentRef;
use foldershare_database::keys;
use helpers::{Injected, InterleavingStore, Scenario, TestApp, folder_item};

async fn scenario() -> (Arc<InterleavingStore>, Scenario) {
    let store = Arc::new(InterleavingStore::new());
    let app = TestApp::with_store(store.clone()).await;
    (store, Scenario::on(app).await)
}

#[tokio::test]
async fn test_full_tree_mixes_before_and_after_state() {
    let (store, s) = scenario().await;

    // Both folders are written once the top level has been listed. The
    // new top-level folder is missed, the new grandchild is picked up.
    let (top, top_item) = folder_item("Z", ParentRef::Root);
    let (deep, deep_item) = folder_item("D", s.b.id.clone());
    store.arm(keys::children_partition(&ParentRef::Root), Injected::Put(top_item));
    store.arm(keys::children_partition(&ParentRef::Root), Injected::Put(deep_item));

    let tree = s.app.services.trees.build_full_tree().await.unwrap();
    assert_eq!(store.pending(), 0);
    assert!(tree.find(&top.id).is_none());
    assert!(tree.find(&deep.id).is_some());

    let settled = s.app.services.trees.build_full_tree().await.unwrap();
    assert!(settled.find(&top.id).is_some());
    assert_eq!(settled.total_folders, 5);
}

#[tokio::test]
async fn test_filtered_tree_can_show_a_folder_deleted_mid_walk() {
    let (store, s) = scenario().await;

    store.arm(
        keys::children_partition(&ParentRef::Folder(s.a.id.clone())),
        Injected::Delete(keys::folder_meta(&s.b.id)),
    );

    let stale = s.app.services.folders.list_folders(&s.u).await.unwrap();
    assert!(stale.find(&s.b.id).is_some());

    let fresh = s.app.services.folders.list_folders(&s.u).await.unwrap();
    assert!(fresh.find(&s.b.id).is_none());
    assert_eq!(fresh.total_folders, 2);
}

#[tokio::test]
async fn test_create_during_cascade_leaves_an_orphan() {
    let (store, s) = scenario().await;

    // A child of B is written after B's children were listed, so the
    // cascade never sees it.
    let (orphan, orphan_item) = folder_item("Late", s.b.id.clone());
    store.arm(
        keys::children_partition(&ParentRef::Folder(s.b.id.clone())),
        Injected::Put(orphan_item),
    );

    let report = s
        .app
        .services
        .folders
        .delete_folder(&s.app.admin, &s.a.id)
        .await
        .unwrap();
    assert_eq!(report.folders, 3);

    assert!(store.get(&keys::folder_meta(&orphan.id)).await.unwrap().is_some());
    assert!(store.get(&keys::folder_meta(&s.b.id)).await.unwrap().is_none());

    let tree = s.app.services.trees.build_full_tree().await.unwrap();
    assert!(tree.is_empty());

    // The orphan is unreachable from the top and grants nothing.
    assert!(!s.app.has_access("u", &orphan.id).await);
}

#[tokio::test]
async fn test_assignment_during_filtered_walk_is_not_seen() {
    let (store, s) = scenario().await;
    let x = s.app.folder("X", None).await;

    // The user's grants are resolved before the closure walk starts.
    let assignment = foldershare_core::types::Item::encode(
        keys::assignment(&x.id, "u"),
        Some(keys::assignment_index(&x.id, "u")),
        &foldershare_entity::assignment::Assignment::new(x.id.clone(), "u"),
    )
    .unwrap();
    store.arm(keys::user_partition("u"), Injected::Put(assignment));

    let first = s.app.services.folders.list_folders(&s.u).await.unwrap();
    assert!(first.find(&x.id).is_none());

    let second = s.app.services.folders.list_folders(&s.u).await.unwrap();
    assert!(second.find(&x.id).is_some());
}
