//! Tiny - An ephemeral item store over HTTP
//!
//! Serves the item API and runs the background TTL sweep until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::{signal, sync::watch};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiny::api::create_router;
use tiny::store::open_store;
use tiny::{spawn_cleanup_task, AppState, Config, Metrics};

/// Main entry point for the item store server.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Open the configured store backend
/// 4. Start background TTL cleanup task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. On SIGINT/SIGTERM, stop the cleanup task and drain the server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // RUST_LOG wins; LOG_LEVEL is the fallback
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tiny={0},tower_http={0}", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        service = %config.service_name,
        env = %config.environment,
        "Starting item store server"
    );
    info!(?config, "Configuration loaded");

    let store = open_store(&config)
        .await
        .with_context(|| format!("failed to open {:?} store in {}", config.store_backend, config.data_dir))?;
    let metrics = Arc::new(Metrics::new().context("failed to register metrics")?);
    info!(backend = ?config.store_backend, "Item store initialized");

    // Flipped to true exactly once, on shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup_handle = spawn_cleanup_task(
        store.clone(),
        metrics.clone(),
        config.cleanup_period(),
        shutdown_rx.clone(),
    );

    let app = create_router(AppState::new(store, metrics));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    let mut server_shutdown = shutdown_rx;
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*server_shutdown.borrow() {
                    if server_shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
    });

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut server => {
            shutdown_tx.send_replace(true);
            if let Err(err) = cleanup_handle.await {
                warn!(error = %err, "Cleanup task ended abnormally");
            }
            result
                .context("server task panicked")?
                .context("server stopped unexpectedly")?;
            return Ok(());
        }
    }

    shutdown_tx.send_replace(true);

    if let Err(err) = cleanup_handle.await {
        warn!(error = %err, "Cleanup task ended abnormally");
    }

    match tokio::time::timeout(config.shutdown_grace(), server).await {
        Ok(result) => {
            result
                .context("server task panicked")?
                .context("server error during shutdown")?;
            info!("Server stopped gracefully");
        }
        Err(_) => warn!(
            timeout_secs = config.shutdown_timeout,
            "Graceful shutdown timed out, dropping open connections"
        ),
    }

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
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
}
