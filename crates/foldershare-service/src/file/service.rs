//! File metadata operations.
//!
//! Object storage is never touched here: uploads and downloads are
//! prepared by handing out storage locators, and URL issuance or object
//! removal is left to the caller.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use foldershare_auth::acl::AccessChecker;
use foldershare_auth::rbac::{RbacEnforcer, SystemPermission};
use foldershare_core::config::files::FilesConfig;
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{FileId, FolderId};
use foldershare_database::repositories::{FileRepository, FolderRepository};
use foldershare_entity::file::{File, FileSummary};
use foldershare_entity::user::UserRole;

use crate::context::RequestContext;

/// Request to prepare an upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadRequest {
    /// Target folder.
    pub folder_id: FolderId,
    /// File name.
    #[validate(length(min = 1, max = 255, message = "file_name is required"))]
    pub file_name: String,
    /// File size in bytes.
    pub file_size: u64,
}

/// A prepared upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTicket {
    /// Identifier reserved for the file.
    pub file_id: FileId,
    /// Target folder.
    pub folder_id: FolderId,
    /// Where the content should be stored.
    pub storage_locator: String,
}

/// Request to record an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmUploadRequest {
    /// Identifier from the upload ticket.
    pub file_id: FileId,
    /// Target folder.
    pub folder_id: FolderId,
    /// File name.
    #[validate(length(min = 1, max = 255, message = "file_name is required"))]
    pub file_name: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Locator from the upload ticket.
    #[validate(length(min = 1, message = "storage_locator is required"))]
    pub storage_locator: String,
}

/// A prepared download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadTicket {
    /// File ID.
    pub file_id: FileId,
    /// File name.
    pub file_name: String,
    /// Where the content is stored.
    pub storage_locator: String,
}

/// Manages file metadata within folders.
#[derive(Debug, Clone)]
pub struct FileService {
    folder_repo: Arc<FolderRepository>,
    file_repo: Arc<FileRepository>,
    checker: Arc<AccessChecker>,
    rbac: Arc<RbacEnforcer>,
    config: FilesConfig,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        checker: Arc<AccessChecker>,
        rbac: Arc<RbacEnforcer>,
        config: FilesConfig,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            checker,
            rbac,
            config,
        }
    }

    /// Lists the files in a folder.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> AppResult<Vec<FileSummary>> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FileList)?;
        self.folder_repo.require(folder_id).await?;
        self.checker
            .require_access(&ctx.username, ctx.role, folder_id)
            .await?;

        Ok(self
            .file_repo
            .list_by_folder(folder_id)
            .await?
            .into_iter()
            .map(FileSummary::from)
            .collect())
    }

    /// Reserves a file id and storage locator for an upload.
    pub async fn prepare_upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> AppResult<UploadTicket> {
        let file_name = clean_file_name(&req.file_name)?;
        req.validate()?;
        self.check_size(req.file_size)?;
        self.rbac
            .require_permission(ctx.role, SystemPermission::FileUpload)?;
        self.folder_repo.require(&req.folder_id).await?;
        self.checker
            .require_access(&ctx.username, ctx.role, &req.folder_id)
            .await?;

        let file_id = FileId::generate();
        let storage_locator = self.storage_locator(&req.folder_id, &file_id, &file_name);

        info!(
            username = %ctx.username,
            folder_id = %req.folder_id,
            file_id = %file_id,
            size = req.file_size,
            "Upload prepared"
        );
        Ok(UploadTicket {
            file_id,
            folder_id: req.folder_id,
            storage_locator,
        })
    }

    /// Records the metadata of an uploaded file.
    ///
    /// The locator must be the one issued for this folder, file id and
    /// name; anything else fails with `InvalidInput`.
    pub async fn confirm_upload(
        &self,
        ctx: &RequestContext,
        req: ConfirmUploadRequest,
    ) -> AppResult<File> {
        let file_name = clean_file_name(&req.file_name)?;
        req.validate()?;
        self.check_size(req.file_size)?;
        self.rbac
            .require_permission(ctx.role, SystemPermission::FileUpload)?;
        self.folder_repo.require(&req.folder_id).await?;
        self.checker
            .require_access(&ctx.username, ctx.role, &req.folder_id)
            .await?;

        let storage_locator = self.storage_locator(&req.folder_id, &req.file_id, &file_name);
        if req.storage_locator != storage_locator {
            warn!(
                username = %ctx.username,
                folder_id = %req.folder_id,
                file_id = %req.file_id,
                "Rejected upload confirmation with a foreign storage locator"
            );
            return Err(AppError::invalid_input(format!(
                "Storage locator does not belong to file {} in folder {}",
                req.file_id, req.folder_id
            )));
        }

        let file = File {
            id: req.file_id,
            folder_id: req.folder_id,
            name: file_name,
            size: req.file_size,
            storage_locator,
            uploaded_by: ctx.username.clone(),
            uploaded_at: Utc::now(),
        };
        self.file_repo.create(&file).await?;
        Ok(file)
    }

    /// Resolves a file for download.
    pub async fn prepare_download(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        file_id: &FileId,
    ) -> AppResult<DownloadTicket> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::FileDownload)?;
        let file = self.require_file(folder_id, file_id).await?;
        self.checker
            .require_access(&ctx.username, ctx.role, folder_id)
            .await?;

        Ok(DownloadTicket {
            file_id: file.id,
            file_name: file.name,
            storage_locator: file.storage_locator,
        })
    }

    /// Deletes a file record. Admin may delete any file; Uploaders only
    /// their own. Returns the removed record so the caller can delete the
    /// stored object.
    pub async fn delete_file(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        file_id: &FileId,
    ) -> AppResult<File> {
        let file = self.require_file(folder_id, file_id).await?;

        let allowed = self
            .rbac
            .has_permission(ctx.role, SystemPermission::FileDelete)
            && (ctx.role == UserRole::Admin || file.uploaded_by == ctx.username);
        if !allowed {
            return Err(AppError::forbidden(format!(
                "User '{}' may not delete file {file_id}",
                ctx.username
            )));
        }

        self.file_repo.delete(folder_id, file_id).await?;

        info!(
            username = %ctx.username,
            folder_id = %folder_id,
            file_id = %file_id,
            "File deleted"
        );
        Ok(file)
    }

    async fn require_file(&self, folder_id: &FolderId, file_id: &FileId) -> AppResult<File> {
        self.file_repo
            .get(folder_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    fn storage_locator(&self, folder_id: &FolderId, file_id: &FileId, file_name: &str) -> String {
        format!(
            "{}/{folder_id}/{file_id}/{file_name}",
            self.config.locator_prefix
        )
    }

    fn check_size(&self, size: u64) -> AppResult<()> {
        if size > self.config.max_file_size_bytes {
            return Err(AppError::invalid_input(format!(
                "File size exceeds maximum of {} bytes",
                self.config.max_file_size_bytes
            )));
        }
        Ok(())
    }
}

/// Trim a file name, rejecting blank names and path separators.
fn clean_file_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("file_name is required"));
    }
    if name.contains('/') {
        return Err(AppError::invalid_input(format!(
            "Invalid file name: '{raw}'"
        )));
    }
    Ok(name.to_string())
}
