//! # foldershare-entity
//!
//! Domain entity models for FolderShare. Every struct in this crate is
//! either a stored record (folder meta, assignment, file, user profile) or
//! a shape produced to callers (tree nodes, summaries). All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod assignment;
pub mod file;
pub mod folder;
pub mod user;
