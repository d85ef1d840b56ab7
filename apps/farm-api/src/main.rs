//! # Farm Share API server
//!
//! Loads configuration, installs logging, opens the database and serves
//! HTTP until Ctrl+C or SIGTERM.

use tokio::net::TcpListener;
use tracing::info;

use farm_api::{build_app, telemetry, AppConfig, AppState};
use farm_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    telemetry::init(&config.logging)?;

    info!("Starting Farm Share API server...");

    // Connect to database (migrations run on connect)
    let db_config = DbConfig::new(&config.database.path)
        .max_connections(config.database.max_connections)
        .busy_timeout(config.busy_timeout());
    let db = Database::new(db_config).await?;
    info!(path = %config.database.path.display(), "Database ready");

    // Build server address
    let addr = config.socket_addr()?;

    // Create shared state
    let state = AppState::new(db.clone(), config)?;
    let app = build_app(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

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
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
