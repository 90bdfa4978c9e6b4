//! Pillbox Server
//!
//! HTTP front end for the pill catalog plus the process that hosts the
//! retention worker.
//!
//! The database handle, configuration and worker are created once in
//! [`start_server`] and handed down explicitly; there is no process-wide
//! state.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod handlers;
pub mod logging;

use config::{ConfigError, PillboxConfig};
use handlers::{create_router, AppState};
use pillbox_domain::StoreProvider;
use pillbox_janitor::{Janitor, JanitorError, JanitorMetrics, JanitorWorker};
use pillbox_store::{SqliteDatabase, StoreError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database could not be prepared
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Retention pass failed
    #[error("Janitor error: {0}")]
    Janitor(#[from] JanitorError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Routes plus the middleware stack (request tracing, CORS)
pub fn build_app(state: AppState, config: &PillboxConfig) -> axum::Router {
    let app = create_router(state).layer(TraceLayer::new_for_http());

    match config.cors.to_layer() {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// Start the Pillbox HTTP server
///
/// Creates the pills table if absent, spawns the retention worker when
/// enabled, and serves until Ctrl+C. The worker is stopped before this
/// returns.
pub async fn start_server(config: PillboxConfig) -> Result<(), ServerError> {
    info!("Starting Pillbox");
    info!("Bind address: {}", config.server.bind_addr());
    info!("Database: {}", config.database.path.display());

    let db = SqliteDatabase::new(&config.database.path);
    db.initialize()?;
    let state = AppState::new(db);

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let worker = if config.janitor.enabled {
        let mut worker = JanitorWorker::new(config.janitor.clone());
        let db = Arc::clone(&state.db);
        Some(tokio::spawn(async move {
            worker
                .run_until(db.as_ref(), async move {
                    // A dropped sender also means stop
                    let _ = stop_rx.changed().await;
                })
                .await;
        }))
    } else {
        info!("Janitor disabled, retention sweep will not run");
        None
    };

    let app = build_app(state, &config);

    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    info!("Pillbox listening on {}", config.server.bind_addr());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()));

    // Stop the worker whether or not the server exited cleanly
    let _ = stop_tx.send(true);
    if let Some(handle) = worker {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Janitor worker panicked");
        }
    }

    info!("Pillbox stopped");
    served
}

/// Run one retention pass against the configured database
///
/// Ignores `janitor.enabled`: an explicit sweep always runs.
pub fn run_sweep(config: &PillboxConfig) -> Result<JanitorMetrics, ServerError> {
    let db = SqliteDatabase::new(&config.database.path);
    db.initialize()?;

    let mut store = db.open()?;
    let mut janitor = Janitor::new(config.janitor.clone());
    janitor.sweep(&mut store)?;

    Ok(janitor.metrics().clone())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
