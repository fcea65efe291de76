/// Todo model and database operations
///
/// A todo is a piece of text with a completion flag. The identifier and the
/// creation timestamp are assigned by the database and never change afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     seq BIGINT GENERATED ALWAYS AS IDENTITY,
///     text TEXT NOT NULL CHECK (length(btrim(text)) > 0),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
/// );
/// ```
///
/// # Wire format
///
/// ```json
/// {
///   "_id": "5b0c7a1e-3a0e-4f0e-9a55-1c1f1e2d3c4b",
///   "text": "Buy milk",
///   "completed": false,
///   "createdAt": "2025-01-03T12:00:00Z"
/// }
/// ```
///
/// # Example
///
/// ```no_run
/// use todo_shared::models::todo::{CreateTodo, Todo, UpdateTodo};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let todo = Todo::create(&pool, CreateTodo { text: "Buy milk".to_string() }).await?;
///
/// let done = UpdateTodo { completed: Some(true), ..Default::default() };
/// Todo::update(&pool, todo.id, done).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// Returned when a string is not a syntactically valid todo identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoIdError {
    #[error("Invalid todo id: {0:?}")]
    Malformed(String),
}

/// Todo identifier
///
/// Parsing is the syntactic check: anything that is not a UUID can never
/// name a todo, so it is rejected before the store is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Generates a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TodoId {
    type Err = TodoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TodoIdError::Malformed(s.to_string()))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A stored todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Identifier assigned at creation
    #[serde(rename = "_id")]
    pub id: TodoId,

    /// What needs doing (never blank)
    pub text: String,

    /// Whether the todo is done
    pub completed: bool,

    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a todo
///
/// New todos always start out not completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Partial update for a todo
///
/// Only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    /// New text
    pub text: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// True when the update would not change anything
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Applies the present fields to `todo` in place
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(text) = self.text {
            todo.text = text;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

impl Todo {
    /// Inserts a new todo and returns it with its generated id and timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the row (blank text violates
    /// the check constraint) or the connection fails.
    pub async fn create(pool: &PgPool, data: CreateTodo) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (text)
            VALUES ($1)
            RETURNING id, text, completed, created_at
            "#,
        )
        .bind(data.text)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Lists every todo, newest first
    ///
    /// Equal timestamps fall back to `seq`, so the later insert comes first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, completed, created_at
            FROM todos
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Finds a todo by ID
    pub async fn find_by_id(pool: &PgPool, id: TodoId) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, completed, created_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Updates the supplied fields of a todo
    ///
    /// An empty update still round-trips to the database so that a missing
    /// todo is reported as `None`.
    ///
    /// # Returns
    ///
    /// The updated todo, or None if no todo has this ID
    pub async fn update(
        pool: &PgPool,
        id: TodoId,
        data: UpdateTodo,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut assignments = Vec::with_capacity(2);
        let mut bind_count = 1;

        if data.text.is_some() {
            bind_count += 1;
            assignments.push(format!("text = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            assignments.push(format!("completed = ${}", bind_count));
        }

        let query = format!(
            "UPDATE todos SET {} WHERE id = $1 RETURNING id, text, completed, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Todo>(&query).bind(id);

        if let Some(text) = data.text {
            q = q.bind(text);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let todo = q.fetch_optional(pool).await?;

        Ok(todo)
    }

    /// Deletes a todo by ID
    ///
    /// # Returns
    ///
    /// True if a todo was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: TodoId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
