//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics recorder when configured
//! - Build the HTTP server (outbound client, static service, layers)
//! - Bind the listener and log where everything is reachable
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build outbound HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the server described by an already-validated `config`.
pub async fn run(config: ServerConfig, shutdown: ShutdownSignal) -> Result<(), StartupError> {
    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let addr = config.listener.socket_addr();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| StartupError::Bind { addr, source })?;

    let root = server.config().static_files.root.display().to_string();
    let prefix = server.config().proxy.prefix.clone();
    tracing::info!(directory = %root, url = %format!("http://localhost:{}/", local_addr.port()), "Serving");
    tracing::info!("COOP/COEP headers: enabled");
    tracing::info!(
        url = %format!("http://localhost:{}{}<url>", local_addr.port(), prefix),
        "CORS proxy"
    );

    server.run(listener, shutdown).await.map_err(StartupError::Serve)
}
