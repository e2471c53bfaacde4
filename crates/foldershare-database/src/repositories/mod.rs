//! Repository implementations for all FolderShare entities.

pub mod assignment;
pub mod file;
pub mod folder;
pub mod user;

pub use assignment::AssignmentRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use user::UserRepository;
