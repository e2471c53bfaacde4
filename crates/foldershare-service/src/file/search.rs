//! File name search scoped by folder access.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use foldershare_auth::acl::{AccessChecker, FolderScope};
use foldershare_auth::rbac::{RbacEnforcer, SystemPermission};
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_database::repositories::FileRepository;
use foldershare_entity::file::{File, FileSummary};

use crate::context::RequestContext;

/// One search match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matching file.
    #[serde(flatten)]
    pub file: FileSummary,
    /// Path of the owning folder, such as `/A/B`.
    pub folder_path: String,
}

/// Search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// The trimmed query.
    pub query: String,
    /// Matches, ordered by file name.
    pub files: Vec<SearchHit>,
}

/// Case-insensitive substring search over file names.
#[derive(Debug, Clone)]
pub struct SearchService {
    file_repo: Arc<FileRepository>,
    scope: Arc<FolderScope>,
    checker: Arc<AccessChecker>,
    rbac: Arc<RbacEnforcer>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        scope: Arc<FolderScope>,
        checker: Arc<AccessChecker>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            file_repo,
            scope,
            checker,
            rbac,
        }
    }

    /// Search file names.
    ///
    /// Admin searches every file. Everyone else searches only the folders
    /// reachable from their assignments.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> AppResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query is required"));
        }
        self.rbac
            .require_permission(ctx.role, SystemPermission::FileSearch)?;

        let candidates = self.candidates(ctx).await?;
        let needle = query.to_lowercase();

        let mut matches: Vec<File> = candidates
            .into_iter()
            .filter(|file| file.name_matches(&needle))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let mut files = Vec::with_capacity(matches.len());
        for file in matches {
            let folder_path = self.checker.folder_path(&file.folder_id).await?;
            files.push(SearchHit {
                file: file.into(),
                folder_path,
            });
        }

        debug!(username = %ctx.username, query, hits = files.len(), "File search");
        Ok(SearchResults {
            query: query.to_string(),
            files,
        })
    }

    async fn candidates(&self, ctx: &RequestContext) -> AppResult<Vec<File>> {
        if ctx.is_admin() {
            return self.file_repo.scan_all().await;
        }

        let assigned = self.checker.assigned_folder_ids(&ctx.username).await?;
        if assigned.is_empty() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for folder_id in self.scope.closure_ids(&assigned).await? {
            files.extend(self.file_repo.list_by_folder(&folder_id).await?);
        }
        Ok(files)
    }
}
