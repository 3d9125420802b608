//! # Caja API
//!
//! HTTP server for the sales and withdrawals ledger.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load config (env) ──► open database (+ migrations) ──► bind listener  │
//! │                                                              │          │
//! │                                                              ▼          │
//! │  close database ◄── graceful shutdown (Ctrl-C / SIGTERM) ◄── serve     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use caja_api::{router, ApiConfig, AppState};
use caja_db::migrations::migration_status;
use caja_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,caja_api=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting Caja API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        addr = %config.listen_address(),
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    // Open the store
    let db = Database::new(config.db_config()).await?;
    let (total, applied) = migration_status(db.pool()).await?;
    info!(total, applied, "Database ready");

    let state = Arc::new(AppState::new(db.clone()));
    let app = router(state);

    let listener = TcpListener::bind(config.listen_address()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
