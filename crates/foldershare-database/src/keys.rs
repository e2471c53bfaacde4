//! Key builders for every item FolderShare stores.
//!
//! Centralising key construction keeps the single-table layout in one
//! place:
//!
//! | Entity       | pk                | sk                | gsi1pk             | gsi1sk               |
//! |--------------|-------------------|-------------------|--------------------|----------------------|
//! | Folder meta  | `FOLDER#<id>`     | `META`            | `PARENT#<parent>`  | `FOLDER#<id>`        |
//! | Assignment   | `FOLDER#<id>`     | `ASSIGN#<user>`   | `USER#<user>`      | `ASSIGN#FOLDER#<id>` |
//! | File         | `FOLDER#<id>`     | `FILE#<fileId>`   | `FILE#<fileId>`    | `FOLDER#<id>`        |
//! | User profile | `USER#<user>`     | `PROFILE`         | `ROLE#<role>`      | `USER#<user>`        |

use foldershare_core::types::{FileId, FolderId, IndexKey, ItemKey, ParentRef};
use foldershare_entity::user::UserRole;

/// Sort key of a folder's meta record.
pub const META: &str = "META";
/// Sort key of a user profile.
pub const PROFILE: &str = "PROFILE";
/// Sort-key prefix of assignment records under a folder.
pub const ASSIGN_PREFIX: &str = "ASSIGN#";
/// Sort-key prefix of file records under a folder.
pub const FILE_PREFIX: &str = "FILE#";
/// Secondary sort-key prefix of a user's assignments.
pub const USER_ASSIGNMENT_PREFIX: &str = "ASSIGN#FOLDER#";
/// Secondary sort-key prefix of users listed under a role.
pub const USER_PREFIX: &str = "USER#";

/// Partition and secondary sort-key prefix of folder records.
pub const FOLDER_PREFIX: &str = "FOLDER#";
const PARENT_PREFIX: &str = "PARENT#";
const ROLE_PREFIX: &str = "ROLE#";

// ── Folder keys ────────────────────────────────────────────

/// Partition holding a folder's meta, assignments, and files.
pub fn folder_partition(folder_id: &FolderId) -> String {
    format!("{FOLDER_PREFIX}{folder_id}")
}

/// Primary key of a folder's meta record.
pub fn folder_meta(folder_id: &FolderId) -> ItemKey {
    ItemKey::new(folder_partition(folder_id), META)
}

/// Secondary partition listing the children of `parent`.
pub fn children_partition(parent: &ParentRef) -> String {
    format!("{PARENT_PREFIX}{parent}")
}

/// Secondary key linking a folder to its parent.
pub fn folder_index(parent: &ParentRef, folder_id: &FolderId) -> IndexKey {
    IndexKey::new(children_partition(parent), folder_partition(folder_id))
}

/// Extract the folder id from a `FOLDER#<id>` partition key.
pub fn folder_id_from_partition(pk: &str) -> Option<FolderId> {
    pk.strip_prefix(FOLDER_PREFIX)?.parse().ok()
}

// ── Assignment keys ────────────────────────────────────────

/// Primary key of a (folder, user) assignment.
pub fn assignment(folder_id: &FolderId, username: &str) -> ItemKey {
    ItemKey::new(
        folder_partition(folder_id),
        format!("{ASSIGN_PREFIX}{username}"),
    )
}

/// Secondary key resolving an assignment from the user's side.
pub fn assignment_index(folder_id: &FolderId, username: &str) -> IndexKey {
    IndexKey::new(
        user_partition(username),
        format!("{USER_ASSIGNMENT_PREFIX}{folder_id}"),
    )
}

/// Extract the folder id from an `ASSIGN#FOLDER#<id>` secondary sort key.
pub fn folder_id_from_assignment_index(gsi1sk: &str) -> Option<FolderId> {
    gsi1sk.strip_prefix(USER_ASSIGNMENT_PREFIX)?.parse().ok()
}

// ── File keys ──────────────────────────────────────────────

/// Primary key of a file record.
pub fn file(folder_id: &FolderId, file_id: &FileId) -> ItemKey {
    ItemKey::new(
        folder_partition(folder_id),
        format!("{FILE_PREFIX}{file_id}"),
    )
}

/// Secondary partition resolving a file id to its owning folder.
pub fn file_partition(file_id: &FileId) -> String {
    format!("{FILE_PREFIX}{file_id}")
}

/// Secondary key of a file record.
pub fn file_index(folder_id: &FolderId, file_id: &FileId) -> IndexKey {
    IndexKey::new(file_partition(file_id), folder_partition(folder_id))
}

// ── User keys ──────────────────────────────────────────────

/// Partition of a user's profile (and secondary partition of their
/// assignments).
pub fn user_partition(username: &str) -> String {
    format!("{USER_PREFIX}{username}")
}

/// Primary key of a user profile.
pub fn user_profile(username: &str) -> ItemKey {
    ItemKey::new(user_partition(username), PROFILE)
}

/// Secondary partition listing users by role.
pub fn role_partition(role: UserRole) -> String {
    format!("{ROLE_PREFIX}{role}")
}

/// Secondary key of a user profile.
pub fn user_index(role: UserRole, username: &str) -> IndexKey {
    IndexKey::new(role_partition(role), user_partition(username))
}
