//! Persistence backends.

mod memory;
mod postgres;

use std::sync::Arc;

use tracing::info;

use crate::config::{DatabaseConfig, MEMORY_DATABASE_URL};
use crate::error::{RuntimeError, RuntimeResult};
use sirbot_core::BoxedPersistence;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Opens the store selected by `database.url`.
///
/// Returns `None` when no URL is configured; archival is then disabled.
pub async fn open(config: &DatabaseConfig) -> RuntimeResult<Option<BoxedPersistence>> {
    let Some(url) = config.url.as_deref() else {
        info!("No database configured, message archival disabled");
        return Ok(None);
    };

    if url == MEMORY_DATABASE_URL {
        info!("Using in-memory store");
        return Ok(Some(Arc::new(MemoryStore::new())));
    }

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        let store = PgStore::connect(url, config.max_connections).await?;
        return Ok(Some(Arc::new(store)));
    }

    Err(RuntimeError::UnsupportedDatabase(url.to_string()))
}
