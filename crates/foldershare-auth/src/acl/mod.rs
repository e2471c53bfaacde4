//! Assignment-based folder access with downward inheritance.

pub mod checker;
pub mod scope;

pub use checker::AccessChecker;
pub use scope::FolderScope;
