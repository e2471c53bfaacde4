//! Integration tests for folder create, rename, and lookup.

mod helpers;

use foldershare_core::error::ErrorKind;
use foldershare_core::types::{FolderId, ParentRef};
use foldershare_entity::user::UserRole;
use foldershare_service::folder::{CreateFolderRequest, RenameFolderRequest};
use helpers::{Scenario, TestApp};

fn create(name: &str, parent: Option<&FolderId>) -> CreateFolderRequest {
    CreateFolderRequest {
        name: name.to_string(),
        parent_id: parent.cloned(),
    }
}

fn rename(name: &str) -> RenameFolderRequest {
    RenameFolderRequest {
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_create_top_level_and_nested() {
    let app = TestApp::new().await;

    let a = app.folder("  Projects  ", None).await;
    assert_eq!(a.name, "Projects");
    assert!(a.parent_id.is_root());

    let b = app.folder("2024", Some(&a.id)).await;
    assert_eq!(b.parent_id, ParentRef::Folder(a.id.clone()));

    let fetched = app
        .services
        .folders
        .get_folder(&app.admin, &b.id)
        .await
        .unwrap();
    assert_eq!(fetched.id, b.id);
    assert_eq!(fetched.name, "2024");
    assert_eq!(fetched.created_at.timestamp(), b.created_at.timestamp());
}

#[tokio::test]
async fn test_duplicate_sibling_names_rejected() {
    let app = TestApp::new().await;
    let a = app.folder("A", None).await;
    app.folder("Docs", Some(&a.id)).await;

    let err = app
        .services
        .folders
        .create_folder(&app.admin, create("Docs", Some(&a.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = app
        .services
        .folders
        .create_folder(&app.admin, create("A", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The same name under a different parent is fine.
    app.folder("Docs", None).await;
}

#[tokio::test]
async fn test_create_requires_existing_parent() {
    let app = TestApp::new().await;
    let ghost: FolderId = "ghost".parse().unwrap();

    let err = app
        .services
        .folders
        .create_folder(&app.admin, create("Orphan", Some(&ghost)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_blank_names_rejected() {
    let app = TestApp::new().await;
    let a = app.folder("A", None).await;

    let err = app
        .services
        .folders
        .create_folder(&app.admin, create("   ", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let err = app
        .services
        .folders
        .rename_folder(&app.admin, &a.id, rename(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_rename_keeps_parent_and_checks_siblings() {
    let s = Scenario::new().await;
    let folders = &s.app.services.folders;

    let renamed = folders
        .rename_folder(&s.app.admin, &s.b.id, rename("Beta"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Beta");
    assert_eq!(renamed.parent_id, ParentRef::Folder(s.a.id.clone()));
    assert_eq!(renamed.created_at.timestamp(), s.b.created_at.timestamp());

    let err = folders
        .rename_folder(&s.app.admin, &s.b.id, rename("C"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Renaming to its own name is not a conflict.
    folders
        .rename_folder(&s.app.admin, &s.b.id, rename("Beta"))
        .await
        .unwrap();

    // Access follows the folder, not its name.
    assert!(s.app.has_access("u", &s.b.id).await);
}

#[tokio::test]
async fn test_rename_missing_folder() {
    let app = TestApp::new().await;
    let ghost: FolderId = "ghost".parse().unwrap();

    let err = app
        .services
        .folders
        .rename_folder(&app.admin, &ghost, rename("X"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_only_admin_manages_folders() {
    let s = Scenario::new().await;
    let folders = &s.app.services.folders;

    for role in [UserRole::Viewer, UserRole::Reader, UserRole::Uploader] {
        let ctx = foldershare_service::RequestContext::new("u", role);

        let err = folders
            .create_folder(&ctx, create("New", Some(&s.a.id)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = folders
            .rename_folder(&ctx, &s.b.id, rename("New"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = folders.delete_folder(&ctx, &s.a.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    assert_eq!(
        s.app.services.folders.list_folders(&s.app.admin).await.unwrap().total_folders,
        3
    );
}

#[tokio::test]
async fn test_get_folder_respects_access() {
    let s = Scenario::new().await;
    let x = s.app.folder("X", None).await;

    let b = s.app.services.folders.get_folder(&s.u, &s.b.id).await.unwrap();
    assert_eq!(b.name, "B");

    let err = s
        .app
        .services
        .folders
        .get_folder(&s.u, &x.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_folder_chain_stops_at_depth_limit() {
    let app = TestApp::new().await;
    let u = app.create_user("u", UserRole::Reader).await;

    let top = app.folder("L1", None).await;
    let mut leaf = top.clone();
    for level in 2..=64 {
        leaf = app.folder(&format!("L{level}"), Some(&leaf.id)).await;
    }
    app.assign(&top.id, "u").await;

    let err = app
        .services
        .folders
        .create_folder(&app.admin, create("L65", Some(&leaf.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    // Everything up to the limit stays reachable.
    assert!(app.has_access("u", &leaf.id).await);

    let full = app.services.folders.list_folders(&app.admin).await.unwrap();
    assert_eq!(full.total_folders, 64);
    assert!(full.find(&leaf.id).is_some());

    let filtered = app.services.folders.list_folders(&u).await.unwrap();
    assert_eq!(filtered.total_folders, 64);
    assert_eq!(filtered.roots.len(), 1);
}
