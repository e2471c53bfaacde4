//! Core traits defined in `foldershare-core` and implemented by other crates.

pub mod store;

pub use store::KeyValueStore;
