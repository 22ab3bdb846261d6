// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the recommendation engine
// Usage: cargo run --features api --bin api_server

use soil_sync::config::ServiceConfig;
use soil_sync::{create_router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "soil_sync=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = ServiceConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  PORT: {}", config.port);
    tracing::info!(
        "  STORE_PATH: {}",
        config
            .store_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(memory)".to_string())
    );
    tracing::info!("  Prediction service: {}", config.inference.is_some());
    tracing::info!("  Report service: {}", config.report.is_some());

    let state = AppState::from_config(&config);

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
