//! Assign and unassign users on folders (Admin only).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use foldershare_auth::rbac::{RbacEnforcer, SystemPermission};
use foldershare_core::result::AppResult;
use foldershare_core::types::FolderId;
use foldershare_database::repositories::{AssignmentRepository, FolderRepository};
use foldershare_entity::assignment::{Assignment, AssignmentRecord};

use crate::context::RequestContext;

/// Request to assign users to a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignUsersRequest {
    /// Users to assign. Unknown usernames are skipped.
    #[validate(length(min = 1, message = "At least one username is required"))]
    pub usernames: Vec<String>,
}

/// The grants on one folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderAssignments {
    /// Folder ID.
    pub folder_id: FolderId,
    /// Folder name.
    pub folder_name: String,
    /// Assigned users.
    pub assignments: Vec<AssignmentRecord>,
}

/// Manages folder assignments.
#[derive(Debug, Clone)]
pub struct AssignmentService {
    folder_repo: Arc<FolderRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl AssignmentService {
    /// Creates a new assignment service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            folder_repo,
            assignment_repo,
            rbac,
        }
    }

    /// Assigns users to an existing folder.
    pub async fn assign_users(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        req: AssignUsersRequest,
    ) -> AppResult<Vec<Assignment>> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::AssignmentManage)?;
        req.validate()?;
        self.folder_repo.require(folder_id).await?;

        let written = self.assignment_repo.assign(folder_id, &req.usernames).await?;

        info!(
            username = %ctx.username,
            folder_id = %folder_id,
            assigned = written.len(),
            "Assignments written"
        );
        Ok(written)
    }

    /// Removes one user's grant on a folder.
    pub async fn unassign_user(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        username: &str,
    ) -> AppResult<()> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::AssignmentManage)?;
        self.assignment_repo.unassign(folder_id, username).await
    }

    /// Lists the users assigned to a folder.
    pub async fn list_assignments(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> AppResult<FolderAssignments> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::AssignmentManage)?;
        let folder = self.folder_repo.require(folder_id).await?;

        let assignments = self
            .assignment_repo
            .list_by_folder(folder_id)
            .await?
            .into_iter()
            .map(AssignmentRecord::from)
            .collect();

        Ok(FolderAssignments {
            folder_id: folder.id,
            folder_name: folder.name,
            assignments,
        })
    }
}
