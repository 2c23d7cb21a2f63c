use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::KeyValueStore;
use crate::error::StorageResult;

/// In-memory implementation of KeyValueStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        tracing::trace!(key, bytes = value.len(), "Stored item in memory");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let items = self.items.read().await;
        let mut keys: Vec<String> = items.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear(&self) -> StorageResult<()> {
        self.items.write().await.clear();
        Ok(())
    }
}
