//! Folder assignment management.

pub mod service;

pub use service::{AssignUsersRequest, AssignmentService, FolderAssignments};
