//! Local Storage
//!
//! A small key-value store abstraction modelled on browser local storage:
//! string keys map to string values, and every write replaces the whole value.
//!
//! Two implementations are provided:
//!
//! - [`InMemoryStore`]: process-local map, shared between clones
//! - [`FileStore`]: one file per key under a root directory, written atomically
//!
//! Use [`StoreFactory`] to pick one from a [`core_config::StorageConfig`].

pub mod error;
pub mod factory;
pub mod file;
pub mod memory;

use async_trait::async_trait;

pub use error::{StorageError, StorageResult};
pub use factory::StoreFactory;
pub use file::FileStore;
pub use memory::InMemoryStore;

/// String key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; absent keys are not an error
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// All stored keys, sorted
    async fn keys(&self) -> StorageResult<Vec<String>>;

    /// Remove every key
    async fn clear(&self) -> StorageResult<()>;
}
