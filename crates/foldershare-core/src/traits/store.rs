//! Key-value store contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::item::{Item, ItemKey, PutCondition};

/// Schemaless key-value store with one secondary index.
///
/// Implementations carry no business rules and no caching. Queries are
/// paginated internally and return a fully materialized sequence ordered
/// by key only (primary sort key for [`query`](Self::query), secondary
/// sort key for [`query_index`](Self::query_index)).
///
/// Writes are independent: there is no multi-item transaction, and a
/// write is not guaranteed to be visible through the secondary index
/// immediately after it returns.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory", "postgres").
    fn provider_type(&self) -> &str;

    /// Fetch a single item by primary key.
    async fn get(&self, key: &ItemKey) -> AppResult<Option<Item>>;

    /// Write an item, subject to `condition`.
    async fn put(&self, item: Item, condition: PutCondition) -> AppResult<()>;

    /// Delete a single item. Deleting an absent key is not an error.
    async fn delete(&self, key: &ItemKey) -> AppResult<()>;

    /// All items under partition `pk`, optionally restricted to sort keys
    /// starting with `sk_prefix`.
    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> AppResult<Vec<Item>>;

    /// All items whose secondary partition key is `gsi1pk`, optionally
    /// restricted to secondary sort keys starting with `gsi1sk_prefix`.
    async fn query_index(&self, gsi1pk: &str, gsi1sk_prefix: Option<&str>)
    -> AppResult<Vec<Item>>;

    /// Every item in the table whose sort key starts with `sk_prefix`.
    async fn scan(&self, sk_prefix: Option<&str>) -> AppResult<Vec<Item>>;

    /// Delete many items. Either completes or raises a single error; keys
    /// removed before the failure stay removed.
    async fn batch_delete(&self, keys: &[ItemKey]) -> AppResult<()>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
