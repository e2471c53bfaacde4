//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use foldershare_entity::user::UserRole;

/// An operation gated by role, independent of folder assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    // Folder operations
    /// List the folders visible to the caller.
    FolderBrowse,
    /// Create, rename, and delete folders.
    FolderManage,
    /// Assign and unassign users, list assignments.
    AssignmentManage,

    // File operations
    /// List the files in a folder.
    FileList,
    /// Search file names.
    FileSearch,
    /// Request and confirm uploads.
    FileUpload,
    /// Request downloads.
    FileDownload,
    /// Delete files (Uploaders only their own).
    FileDelete,

    // User management
    /// Create, delete, and list users.
    UserManage,
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use SystemPermission::*;

        let browse = [FolderBrowse, FileList, FileSearch];
        let mut policies = HashMap::new();

        policies.insert(UserRole::Viewer, browse.into_iter().collect());

        let reader: HashSet<_> = browse.into_iter().chain([FileDownload]).collect();
        policies.insert(UserRole::Reader, reader);

        let uploader: HashSet<_> = browse.into_iter().chain([FileUpload, FileDelete]).collect();
        policies.insert(UserRole::Uploader, uploader);

        // Admin: everything
        let admin: HashSet<_> = browse
            .into_iter()
            .chain([
                FolderManage,
                AssignmentManage,
                FileUpload,
                FileDownload,
                FileDelete,
                UserManage,
            ])
            .collect();
        policies.insert(UserRole::Admin, admin);

        Self { policies }
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: UserRole, permission: SystemPermission) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
