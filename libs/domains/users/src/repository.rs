use async_trait::async_trait;
use core_config::StorageConfig;
use local_storage::{InMemoryStore, KeyValueStore, StoreFactory};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Key holding the serialized collection when none is configured
pub const DEFAULT_COLLECTION_KEY: &str = core_config::storage::DEFAULT_STORAGE_KEY;

/// Repository trait for User persistence
///
/// The whole collection is one value in the backing store, so every mutation
/// rewrites it in full.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All stored users in stored order; empty when nothing is persisted
    /// or the stored value cannot be parsed
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Append a user; fails if the id is already taken
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>>;

    /// Remove the user with `id`, returning whether one was removed
    async fn remove_by_id(&self, id: &str) -> UserResult<bool>;

    /// Replace the user with the same id in place, or append it
    async fn upsert(&self, user: User) -> UserResult<User>;

    /// Replace the user with the same id in place; `None` if there is none
    async fn update(&self, user: User) -> UserResult<Option<User>>;

    /// Replace a user in a single write
    async fn edit(&self, user: User) -> UserResult<User> {
        self.upsert(user).await
    }
}

/// One element of the stored array
///
/// Elements that don't parse as a User are carried through writes untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    User(User),
    Unreadable(Value),
}

impl StoredEntry {
    fn user(&self) -> Option<&User> {
        match self {
            StoredEntry::User(user) => Some(user),
            StoredEntry::Unreadable(_) => None,
        }
    }

    fn has_id(&self, id: &str) -> bool {
        self.user().is_some_and(|u| u.id == id)
    }
}

/// UserRepository over a KeyValueStore, storing a JSON array under one key
pub struct StoredUserRepository<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    key: String,
    // Serialises read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> std::fmt::Debug for StoredUserRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUserRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl StoredUserRepository<InMemoryStore> {
    /// Repository over a fresh in-memory store (for development/testing)
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

impl StoredUserRepository<dyn KeyValueStore> {
    /// Repository over the store and key described by `config`
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::with_key(StoreFactory::from_config(config), config.key.clone())
    }
}

impl<S: KeyValueStore + ?Sized> StoredUserRepository<S> {
    /// Repository storing the collection under the default `USER` key
    pub fn new(store: Arc<S>) -> Self {
        Self::with_key(store, DEFAULT_COLLECTION_KEY)
    }

    pub fn with_key(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> UserResult<Vec<StoredEntry>> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Vec<StoredEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored users could not be parsed, treating as empty");
                return Ok(Vec::new());
            }
        };

        let unreadable = entries.iter().filter(|e| e.user().is_none()).count();
        if unreadable > 0 {
            warn!(key = %self.key, unreadable, "Skipping stored entries that are not valid users");
        }
        debug!(key = %self.key, count = entries.len() - unreadable, "Loaded users");
        Ok(entries)
    }

    async fn load_users(&self) -> UserResult<Vec<User>> {
        let entries = self.load().await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                StoredEntry::User(user) => Some(user),
                StoredEntry::Unreadable(_) => None,
            })
            .collect())
    }

    async fn save(&self, entries: &[StoredEntry]) -> UserResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set_item(&self.key, &raw).await?;
        debug!(key = %self.key, count = entries.len(), "Saved users");
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> UserRepository for StoredUserRepository<S> {
    async fn list(&self) -> UserResult<Vec<User>> {
        self.load_users().await
    }

    async fn create(&self, user: User) -> UserResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        if entries.iter().any(|e| e.has_id(&user.id)) {
            return Err(UserError::DuplicateId(user.id));
        }

        entries.push(StoredEntry::User(user.clone()));
        self.save(&entries).await?;

        info!(user_id = %user.id, name = %user.name, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let users = self.load_users().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    async fn remove_by_id(&self, id: &str) -> UserResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();

        entries.retain(|e| !e.has_id(id));
        if entries.len() == before {
            return Ok(false);
        }

        self.save(&entries).await?;

        info!(user_id = %id, "Deleted user");
        Ok(true)
    }

    async fn upsert(&self, user: User) -> UserResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        match entries.iter_mut().find(|e| e.has_id(&user.id)) {
            Some(existing) => {
                *existing = StoredEntry::User(user.clone());
                info!(user_id = %user.id, "Updated user");
            }
            None => {
                entries.push(StoredEntry::User(user.clone()));
                info!(user_id = %user.id, "Inserted user on upsert");
            }
        }

        self.save(&entries).await?;
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<Option<User>> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;

        let Some(existing) = entries.iter_mut().find(|e| e.has_id(&user.id)) else {
            return Ok(None);
        };
        *existing = StoredEntry::User(user.clone());

        self.save(&entries).await?;

        info!(user_id = %user.id, "Updated user");
        Ok(Some(user))
    }
}
