//! Folder operations with role and access enforcement.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use foldershare_auth::acl::AccessChecker;
use foldershare_auth::rbac::{RbacEnforcer, SystemPermission};
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{FolderId, ParentRef};
use foldershare_database::repositories::FolderRepository;
use foldershare_entity::folder::{Folder, FolderTree};

use super::cascade::{CascadeCoordinator, SubtreeDeletion};
use super::tree::TreeService;
use crate::context::RequestContext;

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder ID (None for a top-level folder).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Request to rename a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameFolderRequest {
    /// New folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
}

/// Manages folder CRUD operations and tree views.
#[derive(Debug, Clone)]
pub struct FolderService {
    folder_repo: Arc<FolderRepository>,
    trees: Arc<TreeService>,
    cascade: Arc<CascadeCoordinator>,
    checker: Arc<AccessChecker>,
    rbac: Arc<RbacEnforcer>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        trees: Arc<TreeService>,
        cascade: Arc<CascadeCoordinator>,
        checker: Arc<AccessChecker>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            folder_repo,
            trees,
            cascade,
            checker,
            rbac,
        }
    }

    /// Lists the folders visible to the caller: the whole tree for Admin,
    /// the assignment-filtered tree for everyone else.
    pub async fn list_folders(&self, ctx: &RequestContext) -> AppResult<FolderTree> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FolderBrowse)?;

        if ctx.is_admin() {
            self.trees.build_full_tree().await
        } else {
            self.trees.build_filtered_tree(&ctx.username).await
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: &FolderId) -> AppResult<Folder> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FolderBrowse)?;

        let folder = self.folder_repo.require(folder_id).await?;
        self.checker
            .require_access(&ctx.username, ctx.role, folder_id)
            .await?;
        Ok(folder)
    }

    /// Creates a new folder (Admin only).
    ///
    /// A parent already at the configured depth limit cannot take children;
    /// that fails with `InvalidInput`.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FolderManage)?;
        let name = clean_name(&req.name)?;
        req.validate()?;

        let parent = req.parent_id.map_or(ParentRef::Root, ParentRef::Folder);
        if let ParentRef::Folder(parent_id) = &parent {
            let depth = self.checker.depth(parent_id).await?;
            if depth >= self.checker.max_depth() {
                return Err(AppError::invalid_input(format!(
                    "Folder {parent_id} is at the maximum depth of {}",
                    self.checker.max_depth()
                )));
            }
        }
        let folder = self.folder_repo.create(&name, parent).await?;

        info!(
            username = %ctx.username,
            folder_id = %folder.id,
            parent_id = %folder.parent_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder in place (Admin only).
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        req: RenameFolderRequest,
    ) -> AppResult<Folder> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FolderManage)?;
        let name = clean_name(&req.name)?;
        req.validate()?;

        let folder = self.folder_repo.rename(folder_id, &name).await?;

        info!(
            username = %ctx.username,
            folder_id = %folder_id,
            name = %folder.name,
            "Folder renamed"
        );
        Ok(folder)
    }

    /// Deletes a folder with everything beneath it (Admin only).
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> AppResult<SubtreeDeletion> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FolderManage)?;

        let report = self.cascade.delete_subtree(folder_id).await?;

        info!(
            username = %ctx.username,
            folder_id = %folder_id,
            folders = report.folders,
            "Folder deleted"
        );
        Ok(report)
    }
}

/// Trim a folder name, rejecting blank names.
fn clean_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("Folder name is required"));
    }
    Ok(name.to_string())
}
