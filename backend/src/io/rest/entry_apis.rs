//! # REST API for Daily Entries
//!
//! Endpoints for saving and listing per-day shop metrics.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};

use crate::AppState;
use shared::{EntryRangeQuery, SaveEntriesRequest};

/// Create a router for daily entry APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_entries).post(save_entries))
}

/// Save one day's entries for a shop (idempotent upsert)
pub async fn save_entries(
    State(state): State<AppState>,
    Json(request): Json<SaveEntriesRequest>,
) -> impl IntoResponse {
    info!("POST /api/entries - {} on {}", request.shop, request.date);

    match state.entry_service.save_entries(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to save entries: {}", e);
            let status = if e.to_string().contains("cannot be")
                || e.to_string().contains("Invalid date")
                || e.to_string().contains("No entries")
            {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// List entries for one shop over a date range
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryRangeQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/entries - {} {}..{}",
        query.shop, query.start_date, query.end_date
    );

    match state.entry_service.entries_for_range(query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list entries: {}", e);
            let status = if e.to_string().contains("Invalid date")
                || e.to_string().contains("cannot be after")
            {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
