//! Startup orchestration.
//!
//! Order: exporter (when enabled), TLS credential, listener, server. Any
//! failure, including an exporter that cannot bind, is fatal and returned
//! as a `StartupError`; traffic is only accepted once every step succeeded.

use metrics_exporter_prometheus::BuildError;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::{ConfigError, GatewayConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::listener::{self, ListenerError};
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::metrics;

/// Unrecoverable errors that abort process start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid Prometheus address: {0}")]
    MetricsAddress(String),

    #[error("Prometheus exporter error: {0}")]
    Metrics(#[from] BuildError),

    #[error("TLS credential error: {0}")]
    Tls(#[from] TlsError),

    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),

    #[error("failed to build upstream client: {0}")]
    UpstreamClient(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the gateway and serve until a termination signal arrives.
pub async fn launch(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.prometheus_enabled {
        let addr = config
            .observability
            .prometheus_address
            .parse::<SocketAddr>()
            .map_err(|_| StartupError::MetricsAddress(config.observability.prometheus_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let tls = load_tls_config(&config.tls.cert_path, &config.tls.key_path).await?;
    let listener = listener::bind(&config.listener)?;
    let server = HttpServer::new(config.clone())?;

    tracing::info!(
        address = %config.listener.bind_address(),
        upstream = %config.upstream.url,
        cert_path = ?config.tls.cert_path,
        max_upstream_connections = config.upstream.max_connections,
        "Gateway configured"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, tls, server_shutdown).await?;
    Ok(())
}
