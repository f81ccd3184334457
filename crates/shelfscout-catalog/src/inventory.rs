use std::sync::Arc;

use async_trait::async_trait;
use shelfscout_core::{Database, LocalRecord};

use crate::error::InventoryError;

/// The user's own library, searched by case-insensitive substring over title and author.
#[async_trait]
pub trait LocalInventory: Send + Sync {
    async fn search(&self, text: &str) -> Result<Vec<LocalRecord>, InventoryError>;
}

/// [`LocalInventory`] over the SQLite library store.
#[derive(Clone)]
pub struct SqliteInventory {
    db: Arc<Database>,
}

impl SqliteInventory {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocalInventory for SqliteInventory {
    async fn search(&self, text: &str) -> Result<Vec<LocalRecord>, InventoryError> {
        let db = Arc::clone(&self.db);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || db.search_records(&text))
            .await
            .map_err(|e| InventoryError::DatastoreUnavailable(e.to_string()))?
            .map_err(InventoryError::from)
    }
}

/// Stands in for a library that could not be opened; every search fails.
#[derive(Debug, Clone)]
pub struct DisconnectedInventory {
    reason: String,
}

impl DisconnectedInventory {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LocalInventory for DisconnectedInventory {
    async fn search(&self, _text: &str) -> Result<Vec<LocalRecord>, InventoryError> {
        Err(InventoryError::DatastoreUnavailable(self.reason.clone()))
    }
}
