//! Integration tests for the user directory.

mod helpers;

use foldershare_core::error::ErrorKind;
use foldershare_entity::user::UserRole;
use foldershare_service::user::CreateUserRequest;
use helpers::{Scenario, TestApp};

#[tokio::test]
async fn test_create_and_list_users() {
    let app = TestApp::new().await;
    app.create_user("zoe", UserRole::Reader).await;
    app.create_user("amy", UserRole::Uploader).await;
    app.create_user("bob", UserRole::Reader).await;

    let all: Vec<String> = app
        .services
        .users
        .list_users(&app.admin, None)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(all, vec!["amy", "bob", "zoe"]);

    let readers = app
        .services
        .users
        .list_users(&app.admin, Some(UserRole::Reader))
        .await
        .unwrap();
    assert_eq!(readers.len(), 2);

    let amy = app.services.users.get_user(&app.admin, "amy").await.unwrap();
    assert_eq!(amy.role, UserRole::Uploader);
}

#[tokio::test]
async fn test_create_rejects_duplicates_and_bad_names() {
    let app = TestApp::new().await;
    app.create_user("amy", UserRole::Reader).await;

    let err = app
        .services
        .users
        .create_user(
            &app.admin,
            CreateUserRequest {
                username: "amy".to_string(),
                role: UserRole::Admin,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    for bad in ["", "  ", "a#b"] {
        let err = app
            .services
            .users
            .create_user(
                &app.admin,
                CreateUserRequest {
                    username: bad.to_string(),
                    role: UserRole::Viewer,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "username {bad:?}");
    }
}

#[tokio::test]
async fn test_delete_user_removes_assignments() {
    let s = Scenario::new().await;
    s.app.assign(&s.c.id, "u").await;

    let removed = s
        .app
        .services
        .users
        .delete_user(&s.app.admin, "u")
        .await
        .unwrap();
    assert_eq!(removed, 2);

    assert!(!s.app.has_access("u", &s.a.id).await);
    let listing = s
        .app
        .services
        .assignments
        .list_assignments(&s.app.admin, &s.a.id)
        .await
        .unwrap();
    assert!(listing.assignments.is_empty());

    let err = s.app.services.users.get_user(&s.app.admin, "u").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_user_guards() {
    let app = TestApp::new().await;

    let err = app
        .services
        .users
        .delete_user(&app.admin, "admin")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let err = app
        .services
        .users
        .delete_user(&app.admin, "nobody")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_only_admin_manages_users() {
    let app = TestApp::new().await;
    let u = app.create_user("u", UserRole::Uploader).await;

    let err = app.services.users.list_users(&u, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app.services.users.delete_user(&u, "admin").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}
