//! Convenience result type alias for FolderShare.

use crate::error::AppError;

/// A specialized `Result` type for FolderShare operations.
pub type AppResult<T> = Result<T, AppError>;
