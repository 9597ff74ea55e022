//! Configuration schema definitions.
//!
//! All sections default, so an empty file (or none at all) yields a working
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Inbound HTTPS listener.
    pub listener: ListenerConfig,

    /// Upstream JSON-RPC node.
    pub upstream: UpstreamConfig,

    /// TLS credential for the listener.
    pub tls: TlsConfig,

    /// Logging and Prometheus settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_host: String,

    /// TCP port.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl ListenerConfig {
    /// `host:port` string suitable for parsing into a `SocketAddr`.
    pub fn bind_address(&self) -> String {
        if self.bind_host.contains(':') {
            format!("[{}]:{}", self.bind_host, self.port)
        } else {
            format!("{}:{}", self.bind_host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8443,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Upstream node configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// JSON-RPC endpoint every request is POSTed to.
    pub url: String,

    /// Connection establishment timeout in seconds. Also bounds the wait
    /// for a free pool slot.
    pub connect_timeout_secs: u64,

    /// Total time allowed for one upstream exchange, in seconds.
    pub request_timeout_secs: u64,

    /// Maximum concurrent upstream exchanges.
    pub max_connections: usize,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://ethereum.publicnode.com".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            max_connections: 20,
        }
    }
}

/// TLS credential locations (PEM).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// Certificate chain file.
    pub cert_path: PathBuf,

    /// Private key file. Must be an unencrypted PEM key; there is no
    /// passphrase setting.
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("certs/cert.pem"),
            key_path: PathBuf::from("certs/key.pem"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub prometheus_enabled: bool,

    /// Prometheus exporter bind address.
    pub prometheus_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            prometheus_enabled: false,
            prometheus_address: "127.0.0.1:9090".to_string(),
        }
    }
}
