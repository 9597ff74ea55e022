//! Relays validated payloads to the upstream JSON-RPC node.
//!
//! # Responsibilities
//! - POST the payload as JSON, preserving object/array shape
//! - Bound concurrent upstream exchanges with a semaphore
//! - Enforce connect and request timeouts
//! - Return the upstream body untouched, whatever the status code

use axum::body::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;

use crate::config::UpstreamConfig;
use crate::rpc::RpcPayload;

/// Network-level failures talking to the upstream node.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Connection could not be established (DNS, refused, TLS handshake).
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// The exchange exceeded its time budget.
    #[error("upstream timed out")]
    Timeout,

    /// No pool slot freed up within the connect timeout.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Any other failure sending the request.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl ForwardError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout
        } else if err.is_connect() {
            ForwardError::Connect(err)
        } else {
            ForwardError::Request(err)
        }
    }

    /// Short label used for logs and Prometheus.
    pub fn reason(&self) -> &'static str {
        match self {
            ForwardError::Connect(_) => "connect",
            ForwardError::Timeout => "timeout",
            ForwardError::PoolExhausted => "pool_exhausted",
            ForwardError::Request(_) => "request",
            ForwardError::Body(_) => "body",
        }
    }
}

/// HTTP client for the single configured upstream.
///
/// Cheap to clone; clones share the connection pool and the slot semaphore.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    client: reqwest::Client,
    url: String,
    slots: Arc<Semaphore>,
    slot_timeout: Duration,
}

impl UpstreamForwarder {
    /// Build the forwarder and its connection pool.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(config.max_connections)
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            slots: Arc::new(Semaphore::new(config.max_connections)),
            slot_timeout: config.connect_timeout(),
        })
    }

    /// Upstream URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Currently free upstream slots.
    #[cfg(test)]
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Send `payload` upstream and return the raw response body.
    pub async fn forward(&self, payload: &RpcPayload) -> Result<Bytes, ForwardError> {
        let _permit = self.acquire_slot().await?;

        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(ForwardError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "Upstream returned non-success status, passing through");
        }

        response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ForwardError::Timeout
            } else {
                ForwardError::Body(e)
            }
        })
    }

    /// Wait for a free slot, at most the connect timeout.
    async fn acquire_slot(&self) -> Result<OwnedSemaphorePermit, ForwardError> {
        match timeout(self.slot_timeout, self.slots.clone().acquire_owned()).await {
            Ok(Ok(permit)) => Ok(permit),
            // Closed semaphore: the forwarder never closes it, treat as exhausted.
            Ok(Err(_)) | Err(_) => {
                tracing::warn!(
                    wait_secs = self.slot_timeout.as_secs(),
                    "No upstream connection slot available"
                );
                Err(ForwardError::PoolExhausted)
            }
        }
    }
}
