use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use taskd_store::{Page, PageRequest, TaskStore};
use taskd_types::{Task, TaskId};

use crate::error::{ServerError, ServerResult};
use crate::validation::parse_task_request;

/// Shared handler state: the one store instance for this server.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

/// Plain success message body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query string for `GET /tasks`. `page` is kept raw so that junk values
/// fall back to page 1 instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1);
        PageRequest::new(page)
    }
}

/// Ids that do not parse cannot exist in the store.
fn parse_id(raw: &str) -> ServerResult<TaskId> {
    TaskId::parse(raw).map_err(|_| ServerError::TaskNotFound)
}

/// Bare `OPTIONS` requests get an empty 204 on every route.
pub async fn options_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ServerResult<Json<Page<Task>>> {
    let request = params.page_request();
    let page = state
        .store
        .list(request)
        .map_err(|e| ServerError::from_store(e, "failed to list tasks"))?;
    tracing::debug!(page = request.page, returned = page.len(), "listed tasks");
    Ok(Json(page))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Task>> {
    let id = parse_id(&id)?;
    let task = state
        .store
        .get(&id)
        .map_err(|e| ServerError::from_store(e, "internal server error"))?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<(StatusCode, Json<Task>)> {
    let draft = parse_task_request(&body?)?;
    let task = state
        .store
        .create(draft)
        .map_err(|e| ServerError::from_store(e, "failed to create task"))?;
    tracing::info!(id = %task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Json<Task>> {
    // Validate the body before looking at the id, so a bad body is a 400
    // even for an unknown task.
    let draft = parse_task_request(&body?)?;
    let id = parse_id(&id)?;
    let task = state
        .store
        .update(&id, draft)
        .map_err(|e| ServerError::from_store(e, "failed to update task"))?;
    tracing::info!(id = %id, "updated task");
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state
        .store
        .delete(&id)
        .map_err(|e| ServerError::from_store(e, "failed to delete task"))?;
    tracing::info!(id = %id, "deleted task");
    Ok(Json(MessageResponse::new("task deleted successfully")))
}

pub async fn delete_all_tasks(
    State(state): State<AppState>,
) -> ServerResult<Json<MessageResponse>> {
    state
        .store
        .delete_all()
        .map_err(|e| ServerError::from_store(e, "failed to delete tasks"))?;
    tracing::info!("deleted all tasks");
    Ok(Json(MessageResponse::new("All tasks deleted successfully")))
}
