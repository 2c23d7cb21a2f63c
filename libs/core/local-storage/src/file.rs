use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::KeyValueStore;
use crate::error::{StorageError, StorageResult};

const ITEM_EXTENSION: &str = "json";

/// File-backed KeyValueStore storing each key as `<root>/<key>.json`
///
/// Writes go to a temporary sibling and are renamed into place, so readers
/// see either the previous value or the new one. There is no cross-process
/// locking: two processes writing the same key race and the last rename wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn item_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, ITEM_EXTENSION)))
    }
}

/// Keys become file names, so only a conservative character set is accepted.
fn validate_key(key: &str) -> StorageResult<()> {
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if key.is_empty() || key.starts_with('.') || !valid_chars {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.item_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(key, path = %path.display(), bytes = content.len(), "Read item");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.item_path(key)?;
        fs::create_dir_all(&self.root).await?;

        let tmp_path = self.root.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, value).await {
            fs::remove_file(&tmp_path).await.ok();
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            fs::remove_file(&tmp_path).await.ok();
            return Err(e.into());
        }

        debug!(key, path = %path.display(), bytes = value.len(), "Wrote item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.item_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Removed item");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ITEM_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn clear(&self) -> StorageResult<()> {
        for key in self.keys().await? {
            self.remove_item(&key).await?;
        }
        Ok(())
    }
}
