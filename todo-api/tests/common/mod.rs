/// Common test utilities for integration tests
///
/// - An in-memory app wired exactly like the server
/// - A store that always fails, for the 500 paths
/// - Request helpers that return status and JSON body

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::{collections::HashMap, sync::Arc};
use todo_api::app::{build_router, AppState};
use todo_api::config::Config;
use todo_shared::models::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use todo_shared::store::{memory::MemoryTodoStore, StoreError, StoreResult, TodoStore};
use tower::ServiceExt;

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryTodoStore>,
}

impl TestContext {
    /// Creates a new test context with an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryTodoStore::new());
        let app = build_router(AppState::new(store.clone(), test_config(&[])));

        TestContext { app, store }
    }

    /// Creates a router whose store fails every call
    pub fn failing() -> Router {
        build_router(AppState::new(Arc::new(FailingStore), test_config(&[])))
    }

    /// Creates a router with extra configuration on top of the memory store
    pub fn with_config(pairs: &[(&str, &str)]) -> Self {
        let store = Arc::new(MemoryTodoStore::new());
        let app = build_router(AppState::new(store.clone(), test_config(pairs)));

        TestContext { app, store }
    }

    /// Sends a request without a body
    pub async fn send(&self, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        send(&self.app, empty_request(method, uri)).await
    }

    /// Sends a request with a JSON body
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        send(&self.app, json_request(method, uri, &body.to_string())).await
    }

    /// Sends a raw body with a JSON content type
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        send(&self.app, json_request(method, uri, body)).await
    }

    /// Creates a todo through the API and returns its JSON
    pub async fn create_todo(&self, text: &str) -> serde_json::Value {
        let (status, body) = self
            .send_json("POST", "/todos", serde_json::json!({ "text": text }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body
    }
}

fn test_config(pairs: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("TODO_STORE".to_string(), "memory".to_string());
    for (key, value) in pairs {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_vars(|key| vars.get(key).cloned()).unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Runs a request through the router; an empty body comes back as `Null`
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            panic!(
                "response body is not JSON ({}): {}",
                err,
                String::from_utf8_lossy(&bytes)
            )
        })
    };

    (status, body)
}

/// Store that reports itself unavailable on every call
pub struct FailingStore;

#[async_trait]
impl TodoStore for FailingStore {
    async fn create(&self, _data: CreateTodo) -> StoreResult<Todo> {
        Err(unavailable())
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: TodoId) -> StoreResult<Option<Todo>> {
        Err(unavailable())
    }

    async fn update(&self, _id: TodoId, _data: UpdateTodo) -> StoreResult<Option<Todo>> {
        Err(unavailable())
    }

    async fn delete(&self, _id: TodoId) -> StoreResult<bool> {
        Err(unavailable())
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(unavailable())
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}
