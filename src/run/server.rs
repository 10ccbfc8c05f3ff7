use anyhow::{Context, Result};
use tracing::info;

use crate::api::{router, AppState};
use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::db::Database;

/// Serve the JSON API until Ctrl-C. Blocks the calling thread.
pub(crate) fn as_server(config: &Config, db: Database) -> Result<()> {
    let verifier = JwtVerifier::new(config.require_jwt_secret()?);
    let app = router(AppState::new(db, verifier));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
        info!(addr = %config.bind_addr, db = %config.db_path.display(), "server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("server shutdown complete");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
