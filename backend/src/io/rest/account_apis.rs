//! # REST API for Account Management
//!
//! Endpoints for savings accounts: CRUD, balance adjustment and the
//! overview summary.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::{error, info};

use crate::AppState;
use shared::{AdjustBalanceRequest, CreateAccountRequest, UpdateAccountRequest};

/// Create a router for account related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/summary", get(account_summary))
        .route("/:id", put(update_account).delete(delete_account))
        .route("/:id/adjust", post(adjust_balance))
}

fn error_status(e: &anyhow::Error) -> StatusCode {
    let message = e.to_string();
    if message.contains("already exists") {
        StatusCode::CONFLICT
    } else if message.contains("not found") {
        StatusCode::NOT_FOUND
    } else if message.contains("cannot be") || message.contains("Cannot withdraw") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// List all accounts
pub async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/accounts");

    match state.account_service.list_accounts().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list accounts: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing accounts").into_response()
        }
    }
}

/// Create a new account
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts - '{}'", request.name);

    match state.account_service.create_account(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create account: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Full-field edit of one account
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    info!("PUT /api/accounts/{}", id);

    match state.account_service.update_account(id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update account {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Deposit into or withdraw from one account
pub async fn adjust_balance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AdjustBalanceRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/{}/adjust - {}", id, request.amount);

    match state.account_service.adjust_balance(id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to adjust balance of account {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete one account
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/accounts/{}", id);

    match state.account_service.delete_account(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete account {}: {}", id, e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Totals across all accounts
pub async fn account_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/accounts/summary");

    match state.account_service.summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to build account summary: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building summary").into_response()
        }
    }
}
