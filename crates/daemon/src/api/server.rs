/// API Server implementation

use super::handlers::{self, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::info;

/// HTTP server fronting the art generator and the encrypted channel
pub struct ApiServer {
    listen_addr: SocketAddr,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(listen_addr: SocketAddr, state: AppState) -> Self {
        Self { listen_addr, state }
    }

    /// Build the router with all endpoints
    pub fn router(state: AppState) -> Router {
        Router::new()
            // Health check
            .route("/health", get(handlers::health_check))
            // Visible art surface
            .route("/api/generate", post(handlers::generate_art))
            // Encrypted configuration channel
            .route("/api/process", get(handlers::process_channel))
            // Allow browser clients
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        let app = Self::router(self.state);

        info!("API server starting on {}", self.listen_addr);

        let listener = tokio::net::TcpListener::bind(self.listen_addr).await?;

        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

        Ok(())
    }
}
