use std::net::SocketAddr;

use anyhow::Result;
use axum::serve;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shop_tracker_backend::config::ProfitConfig;
use shop_tracker_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; the fmt subscriber also bridges `log` records
    // emitted by the services.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Business rates live next to the database; defaults apply when the
    // file is absent.
    let rates_path = std::env::var("SHOP_TRACKER_RATES").ok();
    let config = ProfitConfig::load_or_default(rates_path.as_deref())?;

    let app_state = initialize_backend(config).await?;
    let app = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    serve(listener, app).await?;

    Ok(())
}
