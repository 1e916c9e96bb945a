//! # REST API for Inventory Management
//!
//! Endpoints for inventory items, weekly snapshots, week tracking and the
//! usage report.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::{error, info};

use crate::AppState;
use shared::{
    SaveSnapshotsRequest, UpdateItemRequest, UpsertItemRequest, UsageReportQuery,
    UsageReportResponse,
};

/// Create a router for inventory related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(upsert_item))
        .route("/items/:id", axum::routing::put(update_item))
        .route("/snapshots", post(save_snapshots))
        .route("/weeks", get(list_weeks))
        .route("/usage", get(usage_report))
}

fn error_status(e: &anyhow::Error) -> StatusCode {
    let message = e.to_string();
    if message.contains("not found") {
        StatusCode::NOT_FOUND
    } else if message.contains("cannot be")
        || message.contains("must be")
        || message.contains("Invalid date")
        || message.contains("No quantities")
    {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// List all inventory items
pub async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/inventory/items");

    match state.inventory_service.list_items().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list items: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing items").into_response()
        }
    }
}

/// Add an item or update its cost by name
pub async fn upsert_item(
    State(state): State<AppState>,
    Json(request): Json<UpsertItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/inventory/items - '{}'", request.name);

    match state.inventory_service.upsert_item(request).await {
        Ok(item) => {
            let response = shared::ItemResponse {
                success_message: format!("Item '{}' added/updated successfully", item.name),
                item,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to upsert item: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Rename an item or change its cost
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    info!("PUT /api/inventory/items/{}", id);

    match state.inventory_service.update_item(id, request).await {
        Ok(item) => {
            let response = shared::ItemResponse {
                success_message: format!("Item '{}' updated successfully", item.name),
                item,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update item {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Save a weekly snapshot batch
pub async fn save_snapshots(
    State(state): State<AppState>,
    Json(request): Json<SaveSnapshotsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/inventory/snapshots - {} on {}",
        request.snapshot_type, request.record_date
    );

    match state.inventory_service.save_snapshots(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to save snapshots: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// List tracked weeks with completeness flags
pub async fn list_weeks(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/inventory/weeks");

    match state.inventory_service.list_weeks().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list weeks: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing weeks").into_response()
        }
    }
}

/// Usage report for one week; an incomplete week returns `report: null`
pub async fn usage_report(
    State(state): State<AppState>,
    Query(query): Query<UsageReportQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/inventory/usage - week {}/{}",
        query.week_number, query.year
    );

    match state
        .inventory_service
        .usage_report(query.week_number, query.year)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(UsageReportResponse { report })).into_response(),
        Err(e) => {
            error!("Failed to build usage report: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building usage report").into_response()
        }
    }
}
