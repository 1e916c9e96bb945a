//! # REST API for Reports
//!
//! Endpoints for the pivoted shop reports, the combined profit report and
//! the meatball trend reports.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};

use crate::AppState;
use shared::{DateRangeQuery, SalesPeriodQuery, Shop};

/// Create a router for report related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shop/:shop", get(shop_report))
        .route("/profit", get(profit_report))
        .route("/meatball/sales", get(meatball_sales))
        .route("/meatball/profit-vs-inventory", get(profit_vs_inventory))
}

fn error_status(e: &anyhow::Error) -> StatusCode {
    let message = e.to_string();
    if message.contains("Invalid date") || message.contains("cannot be after") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Pivoted report for one shop over a date range
pub async fn shop_report(
    State(state): State<AppState>,
    Path(shop): Path<Shop>,
    Query(query): Query<DateRangeQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/reports/shop/{} - {}..{}",
        shop, query.start_date, query.end_date
    );

    match state.report_service.shop_report(shop, query).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to build shop report: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Combined profit report across all shops
pub async fn profit_report(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> impl IntoResponse {
    info!(
        "GET /api/reports/profit - {}..{}",
        query.start_date, query.end_date
    );

    match state.report_service.profit_report(query).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to build profit report: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Meatball sales grouped into weekly or monthly buckets
pub async fn meatball_sales(
    State(state): State<AppState>,
    Query(query): Query<SalesPeriodQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/meatball/sales - {:?}", query.period);

    match state.report_service.meatball_sales_by_period(query.period).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build sales report: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building sales report").into_response()
        }
    }
}

/// Weekly profit and revenue against start-of-week inventory value
pub async fn profit_vs_inventory(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reports/meatball/profit-vs-inventory");

    match state.report_service.profit_vs_inventory().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build profit-vs-inventory report: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error building profit-vs-inventory report",
            )
                .into_response()
        }
    }
}
