/// Todo endpoints
///
/// # Endpoints
///
/// - `GET /todos` - List todos, newest first
/// - `POST /todos` - Create a todo
/// - `GET /todos/:id` - Fetch one todo
/// - `PUT /todos/:id` - Update `completed` and/or `text`
/// - `DELETE /todos/:id` - Delete a todo
///
/// Each handler validates, calls the store once and maps the outcome:
///
/// | Outcome | Status |
/// |---|---|
/// | malformed id, body, or text | 400 |
/// | well-formed id, no such todo | 404 `"Todo not found"` |
/// | store failure | 500 |
///
/// Request bodies are deserialized into explicit schemas and checked with
/// `validator` before anything reaches the store. Text is stored trimmed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use todo_shared::models::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use tracing::{debug, info};
use validator::Validate;

const TEXT_REQUIRED: &str = "Todo text is required";

/// Create todo request
///
/// ```json
/// { "text": "Buy milk" }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(
        required(message = "Todo text is required"),
        length(min = 1, message = "Todo text must not be empty")
    )]
    pub text: Option<String>,
}

impl CreateTodoRequest {
    /// Trims and validates the request into store input
    pub fn into_create(self) -> ApiResult<CreateTodo> {
        let request = Self {
            text: self.text.map(|text| text.trim().to_string()),
        };
        request.validate()?;

        let text = request
            .text
            .ok_or_else(|| ApiError::BadRequest(TEXT_REQUIRED.to_string()))?;

        Ok(CreateTodo { text })
    }
}

/// Update todo request
///
/// Both fields are optional; absent (or `null`) fields are left unchanged.
///
/// ```json
/// { "completed": true }
/// ```
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, message = "Todo text must not be empty"))]
    pub text: Option<String>,

    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    /// Trims and validates the request into a partial update
    pub fn into_update(self) -> ApiResult<UpdateTodo> {
        let request = Self {
            text: self.text.map(|text| text.trim().to_string()),
            completed: self.completed,
        };
        request.validate()?;

        Ok(UpdateTodo {
            text: request.text,
            completed: request.completed,
        })
    }
}

fn parse_id(raw: &str) -> ApiResult<TodoId> {
    Ok(raw.parse::<TodoId>()?)
}

/// List todos
///
/// ```text
/// GET /todos
/// ```
///
/// Returns every todo ordered by `createdAt`, newest first. An empty store
/// gives `[]`.
///
/// # Errors
///
/// - `500 Internal Server Error`: Store failure
pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    let todos = state.store.list().await?;
    debug!(count = todos.len(), "Listed todos");

    Ok(Json(todos))
}

/// Create todo
///
/// ```text
/// POST /todos
/// Content-Type: application/json
///
/// { "text": "Buy milk" }
/// ```
///
/// # Response
///
/// `201 Created`
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
/// # Errors
///
/// - `400 Bad Request`: `text` missing, not a string, or blank; body not JSON
/// - `500 Internal Server Error`: Store failure
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(request) = payload?;
    let data = request.into_create()?;

    let todo = state.store.create(data).await?;
    info!(todo_id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Get todo
///
/// ```text
/// GET /todos/:id
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No todo with this id
/// - `500 Internal Server Error`: Store failure
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;

    let todo = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    Ok(Json(todo))
}

/// Update todo
///
/// ```text
/// PUT /todos/:id
/// Content-Type: application/json
///
/// { "completed": true, "text": "Buy oat milk" }
/// ```
///
/// Only the supplied fields change. `{}` changes nothing and returns the
/// current todo.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id (checked first), wrongly typed field, blank `text`
/// - `404 Not Found`: No todo with this id
/// - `500 Internal Server Error`: Store failure
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let data = request.into_update()?;

    let todo = state
        .store
        .update(id, data)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;
    info!(todo_id = %todo.id, completed = todo.completed, "Todo updated");

    Ok(Json(todo))
}

/// Delete todo
///
/// ```text
/// DELETE /todos/:id
/// ```
///
/// # Response
///
/// `204 No Content`
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id
/// - `404 Not Found`: No todo with this id
/// - `500 Internal Server Error`: Store failure
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    if !state.store.delete(id).await? {
        return Err(ApiError::todo_not_found());
    }
    info!(todo_id = %id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}
