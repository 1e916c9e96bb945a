//! # Shop Tracker Backend
//!
//! Non-UI logic for the multi-shop business tracker.
//!
//! This crate brings together:
//! - **Domain**: reconciliation, profit and reporting engine plus services
//! - **Storage**: SQLite persistence behind repositories
//! - **IO**: the REST interface the presentation layer talks to
//!
//! The backend is UI-agnostic: any frontend that can speak HTTP/JSON can
//! drive it without modification.
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (forms, charts)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (services, pure engine)
//!     ↓
//! Storage Layer (SQLite, repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ProfitConfig;
use crate::domain::{AccountService, EntryService, InventoryService, ReportService, TaskService};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub entry_service: EntryService,
    pub inventory_service: InventoryService,
    pub report_service: ReportService,
    pub account_service: AccountService,
    pub task_service: TaskService,
}

/// Wire all services onto one database connection.
pub fn build_app_state(db: DbConnection, config: ProfitConfig) -> AppState {
    AppState {
        entry_service: EntryService::new(db.clone()),
        inventory_service: InventoryService::new(db.clone()),
        report_service: ReportService::new(db.clone(), config),
        account_service: AccountService::new(db.clone()),
        task_service: TaskService::new(db),
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: ProfitConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::init().await?;

    info!("Setting up domain services");
    Ok(build_app_state(db, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow a local frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .nest("/entries", io::rest::entry_apis::router())
        .nest("/inventory", io::rest::inventory_apis::router())
        .nest("/reports", io::rest::report_apis::router())
        .nest("/accounts", io::rest::account_apis::router())
        .nest("/tasks", io::rest::task_apis::router());

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
