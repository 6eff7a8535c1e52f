//! HTTP fulfillment server
//!
//! A thin host around [`IntentHandler`]: decodes the platform envelope,
//! enforces the optional overall deadline and serializes the response.

pub mod fulfillment;
pub mod health;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::ServerConfig;
use crate::intents::IntentHandler;
use crate::transport::Transport;

/// Shared state for API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    pub handler: IntentHandler,
    /// Deadline for a whole intent; `None` waits for every device
    pub handler_timeout: Option<Duration>,
}

impl ApiState {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            handler: IntentHandler::new(transport),
            handler_timeout: None,
        }
    }

    #[must_use]
    pub fn with_handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler_timeout = timeout;
        self
    }
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(fulfillment::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for platform intents
pub struct ApiServer {
    state: Arc<ApiState>,
    addr: SocketAddr,
}

impl ApiServer {
    /// Create a server for the given transport and configuration
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: &ServerConfig) -> Self {
        let state = ApiState::new(transport).with_handler_timeout(config.handler_timeout);
        Self {
            state: Arc::new(state),
            addr: config.socket_addr(),
        }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(
            addr = %self.addr,
            handler_timeout = ?self.state.handler_timeout,
            "API server listening"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
