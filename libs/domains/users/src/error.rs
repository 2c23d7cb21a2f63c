use local_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<validator::ValidationErrors> for UserError {
    /// Flattens to `field: message` pairs sorted by field name
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        messages.sort();

        UserError::Validation(messages.join("; "))
    }
}
