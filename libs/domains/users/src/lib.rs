//! Users Domain
//!
//! User directory backed by a local key-value store: list, create, edit,
//! delete, search and sort user records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Validation, id assignment, debounced search
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Whole-collection reads and writes under one key
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Store    │  ← local_storage::KeyValueStore (memory or files)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{StoredUserRepository, UserQuery, UserService};
//! use local_storage::FileStore;
//!
//! # async fn run() -> domain_users::UserResult<()> {
//! let store = Arc::new(FileStore::new(".local-storage"));
//! let service = UserService::new(StoredUserRepository::new(store));
//!
//! let users = service.list_users(&UserQuery::new().search("leader")).await?;
//! # Ok(())
//! # }
//! ```

pub mod debounce;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use debounce::Debouncer;
pub use error::{UserError, UserResult};
pub use models::{Company, Role, Status, User, UserInput};
pub use query::{SortOrder, UserQuery};
pub use repository::{StoredUserRepository, UserRepository};
pub use service::{SearchSession, UserService};
