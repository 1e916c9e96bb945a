//! # REST API for Task Management
//!
//! Endpoints for the task tree: CRUD, completion, subtree deletion and the
//! current-task lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::{error, info};

use crate::AppState;
use shared::{CreateTaskRequest, UpdateTaskRequest};

/// Create a router for task related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(add_task))
        .route("/current", get(current_task))
        .route("/:id", put(update_task).delete(delete_task))
        .route("/:id/complete", post(complete_task))
}

fn error_status(e: &anyhow::Error) -> StatusCode {
    let message = e.to_string();
    if message.contains("not found") {
        StatusCode::NOT_FOUND
    } else if message.contains("cannot be") || message.contains("Invalid date") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// List all tasks
pub async fn list_tasks(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/tasks");

    match state.task_service.list_tasks().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list tasks: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing tasks").into_response()
        }
    }
}

/// Add a task or subtask
pub async fn add_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/tasks - '{}'", request.name);

    match state.task_service.add_task(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to add task: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// The current main task, if any
pub async fn current_task(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/tasks/current");

    match state.task_service.current_task().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to get current task: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error getting current task").into_response()
        }
    }
}

/// Edit a task's name, description and deadline
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!("PUT /api/tasks/{}", id);

    match state.task_service.update_task(id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update task {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Mark a task as completed
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("POST /api/tasks/{}/complete", id);

    match state.task_service.complete_task(id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to complete task {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete a task and all its subtasks
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/tasks/{}", id);

    match state.task_service.delete_task(id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to delete task {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
