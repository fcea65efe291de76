/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todo_api::{app::{build_router, AppState}, config::Config};
/// use todo_shared::store::memory::MemoryTodoStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryTodoStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use todo_shared::store::TodoStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through axum's `State` extractor. The store is
/// the only handle to persisted todos; handlers never reach a database any
/// other way.
#[derive(Clone)]
pub struct AppState {
    /// Todo persistence
    pub store: Arc<dyn TodoStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn TodoStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Path prefixes the todo routes are mounted under
///
/// Browser clients call the `/api` form.
const TODO_PREFIXES: [&str; 2] = ["", "/api"];

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET    /health
/// GET    /todos          list, newest first
/// POST   /todos          create
/// GET    /todos/:id      fetch one
/// PUT    /todos/:id      partial update
/// DELETE /todos/:id      delete (204)
/// ```
///
/// Every `/todos` route is also served under `/api/todos`.
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let mut router = Router::new().route("/health", get(routes::health::health_check));

    for prefix in TODO_PREFIXES {
        router = router
            .route(
                &format!("{prefix}/todos"),
                get(routes::todos::list_todos).post(routes::todos::create_todo),
            )
            .route(
                &format!("{prefix}/todos/:id"),
                get(routes::todos::get_todo)
                    .put(routes::todos::update_todo)
                    .delete(routes::todos::delete_todo),
            );
    }

    let cors = cors_layer(&state.config);

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS: permissive for `*`, otherwise the configured origins only
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
