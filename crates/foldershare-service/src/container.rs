//! Service wiring from a single store handle.

use std::sync::Arc;

use foldershare_auth::acl::{AccessChecker, FolderScope};
use foldershare_auth::rbac::RbacEnforcer;
use foldershare_core::config::AppConfig;
use foldershare_core::traits::KeyValueStore;
use foldershare_database::repositories::{
    AssignmentRepository, FileRepository, FolderRepository, UserRepository,
};

use crate::assignment::AssignmentService;
use crate::file::{FileService, SearchService};
use crate::folder::{CascadeCoordinator, FolderService, TreeService};
use crate::user::UserService;

/// Every service, built once at startup around one store handle.
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    /// The shared store handle.
    pub store: Arc<dyn KeyValueStore>,
    /// Folder access checks.
    pub checker: Arc<AccessChecker>,
    /// Tree views.
    pub trees: Arc<TreeService>,
    /// Subtree deletion.
    pub cascade: Arc<CascadeCoordinator>,
    /// Folder operations.
    pub folders: Arc<FolderService>,
    /// Assignment operations.
    pub assignments: Arc<AssignmentService>,
    /// File operations.
    pub files: Arc<FileService>,
    /// File search.
    pub search: Arc<SearchService>,
    /// User directory.
    pub users: Arc<UserService>,
}

impl ServiceContainer {
    /// Wire every repository and service onto `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &AppConfig) -> Self {
        let max_depth = config.access.max_depth;

        let user_repo = Arc::new(UserRepository::new(Arc::clone(&store)));
        let folder_repo = Arc::new(FolderRepository::new(Arc::clone(&store)));
        let file_repo = Arc::new(FileRepository::new(Arc::clone(&store)));
        let assignment_repo = Arc::new(AssignmentRepository::new(
            Arc::clone(&store),
            Arc::clone(&user_repo),
        ));

        let rbac = Arc::new(RbacEnforcer::new());
        let checker = Arc::new(AccessChecker::new(
            Arc::clone(&folder_repo),
            Arc::clone(&assignment_repo),
            max_depth,
        ));
        let scope = Arc::new(FolderScope::new(Arc::clone(&folder_repo), max_depth));
        let trees = Arc::new(TreeService::new(Arc::clone(&scope), Arc::clone(&checker)));
        let cascade = Arc::new(CascadeCoordinator::new(
            Arc::clone(&folder_repo),
            max_depth,
        ));

        let folders = Arc::new(FolderService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&trees),
            Arc::clone(&cascade),
            Arc::clone(&checker),
            Arc::clone(&rbac),
        ));
        let assignments = Arc::new(AssignmentService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&assignment_repo),
            Arc::clone(&rbac),
        ));
        let files = Arc::new(FileService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            Arc::clone(&checker),
            Arc::clone(&rbac),
            config.files.clone(),
        ));
        let search = Arc::new(SearchService::new(
            file_repo,
            scope,
            Arc::clone(&checker),
            Arc::clone(&rbac),
        ));
        let users = Arc::new(UserService::new(user_repo, assignment_repo, rbac));

        Self {
            store,
            checker,
            trees,
            cascade,
            folders,
            assignments,
            files,
            search,
            users,
        }
    }
}
