use core_config::{StorageBackend, StorageConfig};
use std::sync::Arc;
use tracing::info;

use crate::{FileStore, InMemoryStore, KeyValueStore};

/// Factory for creating store instances
pub struct StoreFactory;

impl StoreFactory {
    /// Create the store described by `config`
    pub fn from_config(config: &StorageConfig) -> Arc<dyn KeyValueStore> {
        match &config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Arc::new(InMemoryStore::new())
            }
            StorageBackend::File { dir } => {
                info!(dir = %dir.display(), "Using file storage");
                Arc::new(FileStore::new(dir))
            }
        }
    }
}
