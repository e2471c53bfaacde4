//! Folder assignment entities.

pub mod model;

pub use model::{Assignment, AssignmentRecord};
