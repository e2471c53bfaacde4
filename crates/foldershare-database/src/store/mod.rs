//! Key-value store backends.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use tracing::info;

use foldershare_core::config::store::{StoreConfig, StoreProvider};
use foldershare_core::result::AppResult;
use foldershare_core::traits::KeyValueStore;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Open the store selected by configuration.
///
/// The PostgreSQL backend runs pending migrations before it is handed out.
pub async fn open(config: &StoreConfig) -> AppResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.provider {
        StoreProvider::Memory => Arc::new(MemoryStore::new()),
        StoreProvider::Postgres => {
            let store = PostgresStore::connect(config).await?;
            crate::migration::run_migrations(store.pool()).await?;
            Arc::new(store)
        }
    };

    info!(provider = store.provider_type(), "Key-value store ready");
    Ok(store)
}
