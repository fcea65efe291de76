/// PostgreSQL-backed todo store
///
/// Thin adapter from [`TodoStore`] onto the query methods of
/// [`Todo`](crate::models::todo::Todo).

use super::{StoreError, StoreResult, TodoStore};
use crate::db::pool;
use crate::models::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// Todo store over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Wraps an existing pool. Migrations must already have been applied.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn create(&self, data: CreateTodo) -> StoreResult<Todo> {
        if data.text.trim().is_empty() {
            return Err(StoreError::InvalidData("text must not be blank".to_string()));
        }

        let todo = Todo::create(&self.pool, data).await?;
        debug!(todo_id = %todo.id, "Inserted todo");
        Ok(todo)
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        Ok(Todo::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(Todo::find_by_id(&self.pool, id).await?)
    }

    async fn update(&self, id: TodoId, data: UpdateTodo) -> StoreResult<Option<Todo>> {
        if matches!(&data.text, Some(text) if text.trim().is_empty()) {
            return Err(StoreError::InvalidData("text must not be blank".to_string()));
        }

        Ok(Todo::update(&self.pool, id, data).await?)
    }

    async fn delete(&self, id: TodoId) -> StoreResult<bool> {
        Ok(Todo::delete(&self.pool, id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
