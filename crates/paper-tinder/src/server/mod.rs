//! HTTP server exposing the metadata gateway to browser clients.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::SemanticScholarClient;
use crate::config::Config;
use crate::gateway::{MetadataGateway, ScholarGateway};

/// HTTP front end for the gateway.
pub struct GatewayServer {
    gateway: Arc<dyn MetadataGateway>,
    base_path: String,
}

impl GatewayServer {
    /// Create a server over the live Semantic Scholar gateway.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let base_path = config.base_path.clone();
        let client = SemanticScholarClient::new(config)?;
        let gateway = ScholarGateway::new(Arc::new(client));
        Ok(Self::with_gateway(Arc::new(gateway), base_path))
    }

    /// Create a server over any gateway.
    #[must_use]
    pub fn with_gateway(gateway: Arc<dyn MetadataGateway>, base_path: impl Into<String>) -> Self {
        Self { gateway, base_path: base_path.into() }
    }

    /// Build the router without binding a socket.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        routes::create_router(Arc::clone(&self.gateway), &self.base_path)
    }

    /// Serve until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!(
            "Gateway listening on http://{}{}",
            addr,
            if self.base_path.is_empty() { "/" } else { &self.base_path }
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("Gateway shut down");
        Ok(())
    }
}

impl std::fmt::Debug for GatewayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServer").field("base_path", &self.base_path).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
