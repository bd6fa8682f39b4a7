//! Courier Dispatch Service
//!
//! HTTP admin surface plus the dispatch core: transactional assignment of
//! orders to couriers, expiry release, order polling, and bus-driven order
//! status handling.

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dispatch::config::Config;
use dispatch::di::AppState;
use dispatch::infrastructure::http::{self, HttpState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env().map_err(|e| {
        eprintln!("Configuration error: {e}");
        e
    })?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting courier dispatch service...");

    let state = Arc::new(AppState::new(&config).await.map_err(|e| {
        error!(error = %e, "Failed to initialize application state");
        e
    })?);

    info!("Applying database migrations...");
    Migrator::up(&state.db, None).await?;

    // Start the bus consumer (order status changes)
    if let Err(e) = state.start_consumer().await {
        warn!(error = %e, "Failed to start Kafka consumer (continuing without bus-driven order events)");
    }

    // Start the expiration and order-poll workers
    let worker_handles = state.start_workers(&config);

    let http_state = HttpState {
        couriers: state.courier_admin.clone(),
        dispatch: state.dispatch.clone(),
    };
    let app = http::router(http_state, state.rate_limiter.clone());

    let addr = config.http_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "HTTP server starting");

    // Signal triggers context cancellation: the server stops accepting, the
    // workers drain, then the pool closes.
    let shutdown_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for ctrl-c signal");
                return;
            }
            info!("Received shutdown signal");
            shutdown_state.shutdown();
        })
        .await?;

    info!("Waiting for workers to stop...");
    let drained = tokio::time::timeout(
        Duration::from_secs(5),
        futures::future::join_all(worker_handles),
    )
    .await;
    match drained {
        Ok(_) => info!("Workers stopped"),
        Err(_) => warn!("Workers shutdown timeout - proceeding anyway"),
    }

    info!("Closing database connection...");
    state.db.clone().close().await?;
    info!("Shutdown complete");

    Ok(())
}
