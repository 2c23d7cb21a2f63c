use crate::{env_or_default, ConfigError, FromEnv};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Key under which the user collection is stored
pub const DEFAULT_STORAGE_KEY: &str = "USER";

/// Directory used by the file backend when none is configured
pub const DEFAULT_STORAGE_DIR: &str = ".local-storage";

/// Which key-value store implementation backs the repository
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    Memory,
    /// One JSON file per key under `dir`
    File { dir: PathBuf },
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File { dir } => write!(f, "file:{}", dir.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Memory,
    File,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            "file" | "fs" => Ok(BackendKind::File),
            other => Err(format!("unknown storage backend '{}' (expected 'memory' or 'file')", other)),
        }
    }
}

/// Storage configuration for the user collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub key: String,
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::File { dir: dir.into() },
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl FromEnv for StorageConfig {
    /// Reads from environment variables with defaults:
    /// - USER_STORE_BACKEND: `memory` (default) or `file`
    /// - USER_STORE_DIR: defaults to `.local-storage`, only read for `file`
    /// - USER_STORE_KEY: defaults to `USER`
    fn from_env() -> Result<Self, ConfigError> {
        let kind: BackendKind = env_or_default("USER_STORE_BACKEND", "memory")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "USER_STORE_BACKEND".to_string(),
                details,
            })?;

        let backend = match kind {
            BackendKind::Memory => StorageBackend::Memory,
            BackendKind::File => StorageBackend::File {
                dir: PathBuf::from(env_or_default("USER_STORE_DIR", DEFAULT_STORAGE_DIR)),
            },
        };

        let key = env_or_default("USER_STORE_KEY", DEFAULT_STORAGE_KEY);
        if key.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "USER_STORE_KEY".to_string(),
                details: "storage key cannot be empty".to_string(),
            });
        }

        Ok(Self { backend, key })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}
