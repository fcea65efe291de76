/// Todo persistence
///
/// `TodoStore` is the seam between the HTTP handlers and wherever todos are
/// kept. The API server holds one `Arc<dyn TodoStore>` in its state and hands it
/// to every request; nothing else keeps a database handle.
///
/// # Failure modes
///
/// The two outcomes a caller has to tell apart are kept apart in the types:
///
/// - a todo that does not exist is `Ok(None)` / `Ok(false)`
/// - a store that cannot answer is `Err(StoreError)`
///
/// # Implementations
///
/// - `postgres::PgTodoStore`: PostgreSQL through sqlx
/// - `memory::MemoryTodoStore`: in-process, for tests and local runs
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todo_shared::models::todo::CreateTodo;
/// use todo_shared::store::{memory::MemoryTodoStore, TodoStore};
///
/// # async fn example() -> Result<(), todo_shared::store::StoreError> {
/// let store: Arc<dyn TodoStore> = Arc::new(MemoryTodoStore::new());
/// let todo = store.create(CreateTodo { text: "Buy milk".to_string() }).await?;
/// assert!(store.find_by_id(todo.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use crate::models::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use async_trait::async_trait;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store refused data that breaks a todo invariant
    #[error("Invalid todo data: {0}")]
    InvalidData(String),

    /// The store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD-by-identifier persistence for todos
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// Persists a new, not completed todo and returns it with id and timestamp
    async fn create(&self, data: CreateTodo) -> StoreResult<Todo>;

    /// Returns every todo ordered by creation time, newest first
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    /// Looks a todo up by id
    async fn find_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Applies a partial update; `None` if the todo does not exist
    async fn update(&self, id: TodoId, data: UpdateTodo) -> StoreResult<Option<Todo>>;

    /// Removes a todo; `false` if it did not exist
    async fn delete(&self, id: TodoId) -> StoreResult<bool>;

    /// Checks that the store can serve requests
    async fn ping(&self) -> StoreResult<()>;
}
