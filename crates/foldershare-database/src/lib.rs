//! # foldershare-database
//!
//! Key-value store backends (in-memory and PostgreSQL) and the
//! repositories that encode folders, assignments, files, and user
//! profiles onto them using an adjacency-list layout.

pub mod keys;
pub mod migration;
pub mod repositories;
pub mod store;

pub use store::{MemoryStore, PostgresStore};
