//! axum server for the task API.
//!
//! Every handler is a single store call. Store failures are logged and
//! answered with an opaque 500; ids that match no row still succeed.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    routing::{get, put},
};
use serde::Deserialize;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::payload::Payload;
use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::{ApiError, ApiResult, TaskOp};
use crate::types::{SortOrder, Task, TaskInput};

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(rename = "orderBy")]
    order_by: Option<String>,
}

/// POST /tasks
async fn create_task(
    State(state): State<AppState>,
    Payload(input): Payload<TaskInput>,
) -> ApiResult<&'static str> {
    let id = state
        .db()
        .create_task(&input)
        .map_err(ApiError::store(TaskOp::Create))?;

    info!(task_id = id, "Task created");
    Ok("Task created successfully!")
}

/// GET /tasks?orderBy=data-desc
async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let order = SortOrder::from_query(params.order_by.as_deref());
    let tasks = state
        .db()
        .list_tasks(order)
        .map_err(ApiError::store(TaskOp::List))?;

    debug!(count = tasks.len(), ?order, "Listed tasks");
    Ok(Json(tasks))
}

/// PUT /tasks/{id}
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload(input): Payload<TaskInput>,
) -> ApiResult<&'static str> {
    let (titulo, data_prevista) = input.require_fields().ok_or_else(ApiError::missing_fields)?;

    let changed = state
        .db()
        .update_task(id, titulo, data_prevista)
        .map_err(ApiError::store(TaskOp::Update))?;

    if changed == 0 {
        debug!(task_id = id, "Update matched no task");
    }
    Ok("Task updated successfully!")
}

/// PUT /tasks/{id}/done
async fn complete_task(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<&'static str> {
    let changed = state
        .db()
        .complete_task(id)
        .map_err(ApiError::store(TaskOp::Complete))?;

    if changed == 0 {
        debug!(task_id = id, "Complete matched no task");
    }
    Ok("Task marked as completed.")
}

/// DELETE /tasks/{id}
async fn delete_task(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<&'static str> {
    let changed = state
        .db()
        .delete_task(id)
        .map_err(ApiError::store(TaskOp::Delete))?;

    if changed == 0 {
        debug!(task_id = id, "Delete matched no task");
    }
    Ok("Task deleted successfully.")
}

/// Build the router with all routes. Anything not matched falls through to
/// the static client in `static_dir`.
pub fn build_router(state: AppState, static_dir: &std::path::Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
        .route("/tasks/{id}/done", put(complete_task))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for a running server.
///
/// Dropping the handle without calling [`ServerHandle::shutdown`] also stops
/// the server, since the shutdown channel closes.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            warn!("Server task ended abnormally: {}", e);
        }
    }
}

/// Bind the listener and start serving in a background task.
///
/// The store handle moves into the router state and is released when the
/// server stops.
pub async fn start_server(db: Database, config: &ServerConfig) -> anyhow::Result<ServerHandle> {
    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {} not found; only the API will be served",
            config.static_dir.display()
        );
    }

    let app = build_router(AppState::new(db), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    let addr = listener.local_addr()?;

    info!("Server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }

    #[test]
    fn list_params_read_order_by() {
        let params: ListParams = serde_json::from_str(r#"{"orderBy":"data-desc"}"#).unwrap();
        assert_eq!(params.order_by.as_deref(), Some("data-desc"));
    }
}
