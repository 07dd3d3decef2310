//! Registry server binary.

use std::net::SocketAddr;

use registry_server::{config::Config, create_app, create_state, init_tracing};
use user_store::SqliteUserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!(
        database_url = %config.database_url,
        strict_startup = config.strict_startup,
        "Starting user registry server"
    );

    // The pool connects lazily; verify the database and sync the schema now.
    let store = SqliteUserStore::connect(&config.database_url)?;
    match store.init().await {
        Ok(()) => tracing::info!("Database ready"),
        Err(e) if config.strict_startup => {
            anyhow::bail!("database unavailable at startup: {e}");
        }
        Err(e) => {
            // Degraded mode: keep serving and let each request surface its
            // own database error.
            tracing::warn!(error = %e, "Database unavailable, continuing in degraded mode");
        }
    }

    // Create application state
    let state = create_state(config.clone(), store);

    // Create application router
    let app = create_app(state);

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
