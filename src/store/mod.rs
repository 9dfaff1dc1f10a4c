//! Persistence for users and todos.
//!
//! Handlers and the credential issuer only see the [`Store`] trait. Two backends exist:
//! [`PgStore`] for Postgres and [`MemoryStore`], which keeps everything in process and
//! is selected with a `memory://` database URL.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{NewUser, ObjectId, Todo, User, UserCredentials};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Database URL that selects [`MemoryStore`].
pub const MEMORY_URL: &str = "memory://";

#[async_trait]
pub trait Store: Send + Sync {
    /// Checks that the backend answers.
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError>;

    /// Persists a new account. A taken email yields `AppError::Conflict`.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    /// All todos of `user_id`, newest first.
    async fn list_todos(&self, user_id: &ObjectId) -> Result<Vec<Todo>, AppError>;

    async fn insert_todo(&self, todo: Todo) -> Result<Todo, AppError>;

    async fn find_todo(&self, id: &ObjectId) -> Result<Option<Todo>, AppError>;

    /// Overwrites title, description and status of an existing todo.
    async fn update_todo(&self, todo: &Todo) -> Result<Todo, AppError>;

    /// Returns `false` when nothing was deleted.
    async fn delete_todo(&self, id: &ObjectId) -> Result<bool, AppError>;
}

/// Opens the store named by `database_url`.
pub async fn connect(database_url: &str) -> Result<Arc<dyn Store>, AppError> {
    if database_url == MEMORY_URL {
        log::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(database_url).await?;
    log::info!("Connected to Postgres");
    Ok(Arc::new(store))
}
