//! In-memory key-value store backed by an ordered map.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{Item, ItemKey, PutCondition};

/// Process-local store. Ordering is by `(pk, sk)`, matching the
/// primary-key order of a real table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<BTreeMap<ItemKey, Item>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Every stored key, in primary-key order.
    pub async fn keys(&self) -> Vec<ItemKey> {
        self.items.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &ItemKey) -> AppResult<Option<Item>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn put(&self, item: Item, condition: PutCondition) -> AppResult<()> {
        let mut items = self.items.write().await;
        let present = items.contains_key(&item.key);

        match condition {
            PutCondition::NotExists if present => {
                return Err(AppError::already_exists(format!(
                    "Item {}/{} already exists",
                    item.key.pk, item.key.sk
                )));
            }
            PutCondition::Exists if !present => {
                return Err(AppError::condition_failed(format!(
                    "Item {}/{} does not exist",
                    item.key.pk, item.key.sk
                )));
            }
            _ => {}
        }

        items.insert(item.key.clone(), item);
        Ok(())
    }

    async fn delete(&self, key: &ItemKey) -> AppResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> AppResult<Vec<Item>> {
        let items = self.items.read().await;
        let start = ItemKey::new(pk, sk_prefix.unwrap_or_default());

        let found: Vec<Item> = items
            .range((Bound::Included(start), Bound::Unbounded))
            .take_while(|(key, _)| key.pk == pk)
            .map(|(_, item)| item)
            .take_while(|item| item.matches_primary(pk, sk_prefix))
            .cloned()
            .collect();

        debug!(pk, ?sk_prefix, count = found.len(), "Memory query");
        Ok(found)
    }

    async fn query_index(
        &self,
        gsi1pk: &str,
        gsi1sk_prefix: Option<&str>,
    ) -> AppResult<Vec<Item>> {
        let items = self.items.read().await;

        let mut found: Vec<Item> = items
            .values()
            .filter(|item| item.matches_index(gsi1pk, gsi1sk_prefix))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            let a_sk = a.index.as_ref().map(|i| &i.gsi1sk);
            let b_sk = b.index.as_ref().map(|i| &i.gsi1sk);
            a_sk.cmp(&b_sk).then_with(|| a.key.cmp(&b.key))
        });

        debug!(gsi1pk, ?gsi1sk_prefix, count = found.len(), "Memory index query");
        Ok(found)
    }

    async fn scan(&self, sk_prefix: Option<&str>) -> AppResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| sk_prefix.is_none_or(|prefix| item.key.sk.starts_with(prefix)))
            .cloned()
            .collect())
    }

    async fn batch_delete(&self, keys: &[ItemKey]) -> AppResult<()> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(key);
        }
        debug!(count = keys.len(), "Memory batch delete");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldershare_core::error::ErrorKind;
    use foldershare_core::types::IndexKey;
    use serde_json::json;

    fn item(pk: &str, sk: &str, index: Option<(&str, &str)>) -> Item {
        Item::encode(
            ItemKey::new(pk, sk),
            index.map(|(a, b)| IndexKey::new(a, b)),
            &json!({ "tag": format!("{pk}/{sk}") }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_conditional_put() {
        let store = MemoryStore::new();
        store
            .put(item("A", "1", None), PutCondition::NotExists)
            .await
            .unwrap();

        let err = store
            .put(item("A", "1", None), PutCondition::NotExists)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);

        let err = store
            .put(item("B", "1", None), PutCondition::Exists)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConditionFailed);

        store
            .put(item("A", "1", None), PutCondition::Exists)
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_query_by_partition_and_prefix() {
        let store = MemoryStore::new();
        for (pk, sk) in [
            ("FOLDER#a", "META"),
            ("FOLDER#a", "FILE#2"),
            ("FOLDER#a", "FILE#1"),
            ("FOLDER#a", "ASSIGN#bob"),
            ("FOLDER#b", "FILE#9"),
        ] {
            store
                .put(item(pk, sk, None), PutCondition::Always)
                .await
                .unwrap();
        }

        let files = store.query("FOLDER#a", Some("FILE#")).await.unwrap();
        let sks: Vec<&str> = files.iter().map(|i| i.key.sk.as_str()).collect();
        assert_eq!(sks, vec!["FILE#1", "FILE#2"]);

        let all = store.query("FOLDER#a", None).await.unwrap();
        assert_eq!(all.len(), 4);

        assert!(store.query("FOLDER#c", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_index_orders_by_secondary_sort_key() {
        let store = MemoryStore::new();
        store
            .put(
                item("FOLDER#z", "META", Some(("PARENT#ROOT", "FOLDER#z"))),
                PutCondition::Always,
            )
            .await
            .unwrap();
        store
            .put(
                item("FOLDER#a", "META", Some(("PARENT#ROOT", "FOLDER#a"))),
                PutCondition::Always,
            )
            .await
            .unwrap();
        store
            .put(
                item("FOLDER#c", "META", Some(("PARENT#z", "FOLDER#c"))),
                PutCondition::Always,
            )
            .await
            .unwrap();

        let roots = store.query_index("PARENT#ROOT", None).await.unwrap();
        let pks: Vec<&str> = roots.iter().map(|i| i.key.pk.as_str()).collect();
        assert_eq!(pks, vec!["FOLDER#a", "FOLDER#z"]);

        let none = store
            .query_index("PARENT#ROOT", Some("ASSIGN#"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_scan_and_batch_delete() {
        let store = MemoryStore::new();
        for (pk, sk) in [("FOLDER#a", "FILE#1"), ("FOLDER#b", "FILE#2"), ("FOLDER#b", "META")] {
            store
                .put(item(pk, sk, None), PutCondition::Always)
                .await
                .unwrap();
        }

        assert_eq!(store.scan(Some("FILE#")).await.unwrap().len(), 2);

        store
            .batch_delete(&[
                ItemKey::new("FOLDER#a", "FILE#1"),
                ItemKey::new("FOLDER#b", "FILE#2"),
                ItemKey::new("FOLDER#nope", "META"),
            ])
            .await
            .unwrap();
        assert_eq!(store.keys().await, vec![ItemKey::new("FOLDER#b", "META")]);
    }
}
