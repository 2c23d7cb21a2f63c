use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, instrument};
use validator::Validate;

use crate::debounce::Debouncer;
use crate::error::{UserError, UserResult};
use crate::models::{User, UserInput};
use crate::query::{SortOrder, UserQuery};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate input and store it under a fresh id
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_user(&self, input: UserInput) -> UserResult<User> {
        input.validate()?;

        let user = User::new(input);
        self.repository.create(user).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// List users matching `query`, sorted by name
    pub async fn list_users(&self, query: &UserQuery) -> UserResult<Vec<User>> {
        let users = self.repository.list().await?;
        let total = users.len();
        let users = query.apply(users);

        debug!(total, matched = users.len(), "Listed users");
        Ok(users)
    }

    /// Replace every field of an existing user except its id
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: &str, input: UserInput) -> UserResult<User> {
        input.validate()?;

        self.repository
            .update(User::with_id(id, input))
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        if !self.repository.remove_by_id(id).await? {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

impl<R: UserRepository + 'static> UserService<R> {
    /// Start a search session that runs once typing pauses for `delay`
    ///
    /// Must be called inside a tokio runtime.
    pub fn search(&self, delay: Duration, order: SortOrder) -> SearchSession {
        let (terms, mut settled) = Debouncer::new(delay);
        let (results_tx, results) = mpsc::unbounded_channel();
        let service = self.clone();

        tokio::spawn(async move {
            while let Some(term) = settled.recv().await {
                let query = UserQuery::new().search(term).order(order);
                let result = service.list_users(&query).await;
                if results_tx.send(result).is_err() {
                    break;
                }
            }
        });

        SearchSession { terms, results }
    }
}

/// Debounced search over a UserService
///
/// Dropping the session stops its background tasks.
#[derive(Debug)]
pub struct SearchSession {
    terms: Debouncer<String>,
    results: mpsc::UnboundedReceiver<UserResult<Vec<User>>>,
}

impl SearchSession {
    /// Update the search term, e.g. on every keystroke
    ///
    /// Returns false once the background search has stopped; the term is
    /// dropped and `next_results` yields `None`.
    pub fn set_term(&self, term: impl Into<String>) -> bool {
        self.terms.submit(term.into())
    }

    /// Wait for the results of the next settled term
    pub async fn next_results(&mut self) -> Option<UserResult<Vec<User>>> {
        self.results.recv().await
    }
}
