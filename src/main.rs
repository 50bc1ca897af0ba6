use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_engine::api;
use social_engine::config::Config;
use social_engine::db::Database;
use social_engine::notifications::relay::DeliveryRelay;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,social_engine=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::get();
    info!("Initialized configuration");

    // Initialize database
    let db = Arc::new(Database::connect(config).await?);
    info!("Connected to database");

    // Realtime relay is optional; without credentials notifications are
    // store-only.
    let relay = Arc::new(DeliveryRelay::from_config(&config.relay));
    if relay.is_enabled() {
        info!("Realtime notification relay enabled");
    }

    // Start API server
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_api_server(db, relay).await {
            error!("API server error: {}", e);
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, initiating graceful shutdown");
        }
        _ = api_handle => {
            error!("API server exited unexpectedly");
        }
    }

    info!("social-engine shutdown complete");
    Ok(())
}
