//! Folder management, tree views, and cascading deletion.

pub mod cascade;
pub mod service;
pub mod tree;

pub use cascade::{CascadeCoordinator, SubtreeDeletion};
pub use service::{CreateFolderRequest, FolderService, RenameFolderRequest};
pub use tree::TreeService;
