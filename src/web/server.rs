//! Web server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::db::SessionRepository;
use crate::{BoardsError, Database, Result};

use super::router::{create_health_router, create_router, create_static_router};
use super::state::AppState;

/// Interval between expired session sweeps.
const CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Web server for the forum.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    state: AppState,
}

impl WebServer {
    /// Create a web server from a loaded configuration.
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| BoardsError::Config(format!("invalid server address: {e}")))?;
        let state = AppState::from_config(db, config)?;
        Ok(Self { addr, state })
    }

    /// Create a web server around prepared state.
    pub fn with_state(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the full application router.
    pub fn router(&self) -> Router {
        let server = &self.state.config.server;
        let mut router = create_router(self.state.clone()).merge(create_health_router());

        if server.serve_static {
            if let Some(static_router) = create_static_router(&server.static_path) {
                router = router.merge(static_router);
            }
        }

        router.layer(CompressionLayer::new())
    }

    /// Start the session cleanup background task.
    ///
    /// Runs every hour and removes expired and revoked sessions.
    fn start_session_cleanup_task(db: Database) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                match SessionRepository::new(db.pool()).cleanup_expired().await {
                    Ok(0) => tracing::debug!("No expired sessions to clean up"),
                    Ok(count) => {
                        tracing::info!(deleted_count = count, "Cleaned up expired sessions")
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to clean up sessions"),
                }
            }
        });
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        Self::start_session_cleanup_task(self.state.db.clone());
        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let router = self.router();
        let (listener, _) = self.bind().await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
