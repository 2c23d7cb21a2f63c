use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
