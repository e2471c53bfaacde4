//! Schemaless store items.
//!
//! Every record lives in one logical table addressed by a primary key
//! `(pk, sk)`. Records that participate in the secondary index also carry
//! `(gsi1pk, gsi1sk)`. Everything else is a free-form JSON attribute map.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::result::AppResult;

/// Primary key of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    /// Partition key.
    pub pk: String,
    /// Sort key.
    pub sk: String,
}

impl ItemKey {
    /// Create a primary key.
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// Secondary index key of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexKey {
    /// Secondary partition key.
    pub gsi1pk: String,
    /// Secondary sort key.
    pub gsi1sk: String,
}

impl IndexKey {
    /// Create a secondary index key.
    pub fn new(gsi1pk: impl Into<String>, gsi1sk: impl Into<String>) -> Self {
        Self {
            gsi1pk: gsi1pk.into(),
            gsi1sk: gsi1sk.into(),
        }
    }
}

/// Condition attached to a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutCondition {
    /// Unconditional upsert.
    #[default]
    Always,
    /// Only write when no item with the same primary key exists.
    /// Fails with `AlreadyExists` otherwise.
    NotExists,
    /// Only write when an item with the same primary key exists.
    /// Fails with `ConditionFailed` otherwise.
    Exists,
}

/// A stored item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Primary key.
    pub key: ItemKey,
    /// Secondary index key, if the item is indexed.
    pub index: Option<IndexKey>,
    /// Remaining attributes.
    pub attributes: Map<String, Value>,
}

impl Item {
    /// Build an item by serializing `value` into the attribute map.
    ///
    /// `value` must serialize to a JSON object.
    pub fn encode<T: Serialize>(
        key: ItemKey,
        index: Option<IndexKey>,
        value: &T,
    ) -> AppResult<Self> {
        match serde_json::to_value(value)? {
            Value::Object(attributes) => Ok(Self {
                key,
                index,
                attributes,
            }),
            other => Err(AppError::internal(format!(
                "Item attributes for {}/{} must be an object, got {other}",
                key.pk, key.sk
            ))),
        }
    }

    /// Deserialize the attribute map into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.attributes.clone())).map_err(|e| {
            AppError::with_source(
                crate::error::ErrorKind::Serialization,
                format!("Malformed item {}/{}: {e}", self.key.pk, self.key.sk),
                e,
            )
        })
    }

    /// Whether the item matches a primary-key query.
    pub fn matches_primary(&self, pk: &str, sk_prefix: Option<&str>) -> bool {
        self.key.pk == pk && sk_prefix.is_none_or(|prefix| self.key.sk.starts_with(prefix))
    }

    /// Whether the item matches a secondary-index query.
    pub fn matches_index(&self, gsi1pk: &str, gsi1sk_prefix: Option<&str>) -> bool {
        self.index.as_ref().is_some_and(|index| {
            index.gsi1pk == gsi1pk
                && gsi1sk_prefix.is_none_or(|prefix| index.gsi1sk.starts_with(prefix))
        })
    }
}
