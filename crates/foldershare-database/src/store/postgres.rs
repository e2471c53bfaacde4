//! PostgreSQL-backed key-value store.
//!
//! Every item lives in the single `kv_items` table. Queries are read page
//! by page with keyset pagination and materialized before returning, the
//! way a paginated cloud key-value API is consumed.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};

use foldershare_core::config::store::{DatabaseConfig, StoreConfig};
use foldershare_core::error::{AppError, ErrorKind};
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;
use foldershare_core::types::{IndexKey, Item, ItemKey, PutCondition};

/// Raw table row.
#[derive(Debug, sqlx::FromRow)]
struct KvRow {
    pk: String,
    sk: String,
    gsi1pk: Option<String>,
    gsi1sk: Option<String>,
    attributes: Json<Map<String, Value>>,
}

impl From<KvRow> for Item {
    fn from(row: KvRow) -> Self {
        let index = match (row.gsi1pk, row.gsi1sk) {
            (Some(gsi1pk), Some(gsi1sk)) => Some(IndexKey { gsi1pk, gsi1sk }),
            _ => None,
        };
        Item {
            key: ItemKey {
                pk: row.pk,
                sk: row.sk,
            },
            index,
            attributes: row.attributes.0,
        }
    }
}

/// Key-value store on a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    page_size: i64,
    batch_size: usize,
}

impl PostgresStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool, config: &StoreConfig) -> Self {
        Self {
            pool,
            page_size: i64::from(config.page_size.max(1)),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Connect a new pool from configuration.
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let pool = connect_pool(&config.database).await?;
        Ok(Self::new(pool, config))
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    fn provider_type(&self) -> &str {
        "postgres"
    }

    async fn get(&self, key: &ItemKey) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, KvRow>(
            "SELECT pk, sk, gsi1pk, gsi1sk, attributes FROM kv_items WHERE pk = $1 AND sk = $2",
        )
        .bind(&key.pk)
        .bind(&key.sk)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Item::from))
        .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to get item", e))
    }

    async fn put(&self, item: Item, condition: PutCondition) -> AppResult<()> {
        let (gsi1pk, gsi1sk) = match &item.index {
            Some(index) => (Some(index.gsi1pk.as_str()), Some(index.gsi1sk.as_str())),
            None => (None, None),
        };
        let sql = match condition {
            PutCondition::Always => {
                "INSERT INTO kv_items (pk, sk, gsi1pk, gsi1sk, attributes) \
                 VALUES ($1, $2, $3, $4, $5) \
                 ON CONFLICT (pk, sk) DO UPDATE SET gsi1pk = EXCLUDED.gsi1pk, \
                 gsi1sk = EXCLUDED.gsi1sk, attributes = EXCLUDED.attributes"
            }
            PutCondition::NotExists => {
                "INSERT INTO kv_items (pk, sk, gsi1pk, gsi1sk, attributes) \
                 VALUES ($1, $2, $3, $4, $5) ON CONFLICT (pk, sk) DO NOTHING"
            }
            PutCondition::Exists => {
                "UPDATE kv_items SET gsi1pk = $3, gsi1sk = $4, attributes = $5 \
                 WHERE pk = $1 AND sk = $2"
            }
        };

        let result = sqlx::query(sql)
            .bind(&item.key.pk)
            .bind(&item.key.sk)
            .bind(gsi1pk)
            .bind(gsi1sk)
            .bind(Json(&item.attributes))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to put item", e))?;

        if result.rows_affected() == 0 {
            return Err(match condition {
                PutCondition::Exists => AppError::condition_failed(format!(
                    "Item {}/{} does not exist",
                    item.key.pk, item.key.sk
                )),
                _ => AppError::already_exists(format!(
                    "Item {}/{} already exists",
                    item.key.pk, item.key.sk
                )),
            });
        }
        Ok(())
    }

    async fn delete(&self, key: &ItemKey) -> AppResult<()> {
        sqlx::query("DELETE FROM kv_items WHERE pk = $1 AND sk = $2")
            .bind(&key.pk)
            .bind(&key.sk)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to delete item", e))?;
        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: Option<&str>) -> AppResult<Vec<Item>> {
        let prefix = sk_prefix.unwrap_or_default();
        let mut items = Vec::new();
        let mut last_sk = String::new();

        loop {
            let page = sqlx::query_as::<_, KvRow>(
                "SELECT pk, sk, gsi1pk, gsi1sk, attributes FROM kv_items \
                 WHERE pk = $1 AND starts_with(sk, $2) AND sk > $3 \
                 ORDER BY sk ASC LIMIT $4",
            )
            .bind(pk)
            .bind(prefix)
            .bind(&last_sk)
            .bind(self.page_size)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to query items", e))?;

            let full_page = page.len() as i64 == self.page_size;
            if let Some(last) = page.last() {
                last_sk = last.sk.clone();
            }
            items.extend(page.into_iter().map(Item::from));
            if !full_page {
                break;
            }
        }

        debug!(pk, ?sk_prefix, count = items.len(), "Postgres query");
        Ok(items)
    }

    async fn query_index(
        &self,
        gsi1pk: &str,
        gsi1sk_prefix: Option<&str>,
    ) -> AppResult<Vec<Item>> {
        let prefix = gsi1sk_prefix.unwrap_or_default();
        let mut items: Vec<Item> = Vec::new();
        let mut cursor = (String::new(), String::new(), String::new());

        loop {
            let page = sqlx::query_as::<_, KvRow>(
                "SELECT pk, sk, gsi1pk, gsi1sk, attributes FROM kv_items \
                 WHERE gsi1pk = $1 AND starts_with(gsi1sk, $2) \
                 AND (gsi1sk, pk, sk) > ($3, $4, $5) \
                 ORDER BY gsi1sk ASC, pk ASC, sk ASC LIMIT $6",
            )
            .bind(gsi1pk)
            .bind(prefix)
            .bind(&cursor.0)
            .bind(&cursor.1)
            .bind(&cursor.2)
            .bind(self.page_size)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to query secondary index", e)
            })?;

            let full_page = page.len() as i64 == self.page_size;
            if let Some(last) = page.last() {
                cursor = (
                    last.gsi1sk.clone().unwrap_or_default(),
                    last.pk.clone(),
                    last.sk.clone(),
                );
            }
            items.extend(page.into_iter().map(Item::from));
            if !full_page {
                break;
            }
        }

        debug!(gsi1pk, ?gsi1sk_prefix, count = items.len(), "Postgres index query");
        Ok(items)
    }

    async fn scan(&self, sk_prefix: Option<&str>) -> AppResult<Vec<Item>> {
        let prefix = sk_prefix.unwrap_or_default();
        let mut items: Vec<Item> = Vec::new();
        let mut cursor = (String::new(), String::new());

        loop {
            let page = sqlx::query_as::<_, KvRow>(
                "SELECT pk, sk, gsi1pk, gsi1sk, attributes FROM kv_items \
                 WHERE starts_with(sk, $1) AND (pk, sk) > ($2, $3) \
                 ORDER BY pk ASC, sk ASC LIMIT $4",
            )
            .bind(prefix)
            .bind(&cursor.0)
            .bind(&cursor.1)
            .bind(self.page_size)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Failed to scan items", e))?;

            let full_page = page.len() as i64 == self.page_size;
            if let Some(last) = page.last() {
                cursor = (last.pk.clone(), last.sk.clone());
            }
            items.extend(page.into_iter().map(Item::from));
            if !full_page {
                break;
            }
        }

        Ok(items)
    }

    async fn batch_delete(&self, keys: &[ItemKey]) -> AppResult<()> {
        for chunk in keys.chunks(self.batch_size) {
            let pks: Vec<&str> = chunk.iter().map(|k| k.pk.as_str()).collect();
            let sks: Vec<&str> = chunk.iter().map(|k| k.sk.as_str()).collect();

            sqlx::query(
                "DELETE FROM kv_items WHERE (pk, sk) IN \
                 (SELECT * FROM UNNEST($1::text[], $2::text[]))",
            )
            .bind(&pks)
            .bind(&sks)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Failed to batch delete items", e)
            })?;
        }

        debug!(count = keys.len(), "Postgres batch delete");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Store, "Health check failed", e))
    }
}

/// Create a connection pool from configuration.
async fn connect_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!(
        url = %mask_password(&config.url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Store,
                format!("Failed to connect to database: {e}"),
                e,
            )
        })?;

    info!("Successfully connected to PostgreSQL");
    Ok(pool)
}

/// Mask the password portion of a database URL for safe logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
