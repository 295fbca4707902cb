//! Geocache - a caching reverse-geocoding service
//!
//! Fronts a metered resolution provider with an in-process hot cache,
//! per-key request coalescing, and a best-effort durable mirror.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod provider;
mod storage;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use provider::HttpGeocoder;
use storage::SqliteStore;
use tasks::spawn_cleanup_task;

/// Main entry point for the geocache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and inject the HTTP resolver client
/// 4. Open the durable mirror and rehydrate (memory-only on failure)
/// 5. Start the background maintenance sweep
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geocache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting geocache service");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, ttl={}s, precision={}, port={}, cleanup_interval={}s",
        config.max_entries,
        config.cache_ttl_secs,
        config.coord_precision,
        config.server_port,
        config.cleanup_interval
    );

    // Create application state and inject the resolver client
    let state = AppState::from_config(&config);
    let geocoder = HttpGeocoder::new(config.provider_url.clone())
        .context("failed to construct resolver client")?;
    state.cache.set_provider(Arc::new(geocoder));
    info!(provider = %config.provider_url, "resolver client installed");

    // Open the durable mirror; a failed open degrades to memory-only
    if let Some(db_path) = &config.db_path {
        match SqliteStore::open(db_path) {
            Ok(store) => {
                let loaded = state.cache.attach_store(Arc::new(store));
                info!(loaded, "durable mirror attached");
            }
            Err(err) => {
                warn!(error = %err, "durable mirror unavailable, running memory-only");
            }
        }
    } else {
        info!("persistence disabled, running memory-only");
    }

    // Start background maintenance sweep
    let cleanup_handle = spawn_cleanup_task(Arc::clone(&state.cache), config.cleanup_interval);
    info!("Background maintenance task started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the maintenance task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the maintenance task
    cleanup_handle.abort();
    warn!("Maintenance task aborted");
}
