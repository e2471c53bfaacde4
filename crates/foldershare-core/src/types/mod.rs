//! Core type definitions used across the FolderShare workspace.

pub mod id;
pub mod item;

pub use id::*;
pub use item::{IndexKey, Item, ItemKey, PutCondition};
