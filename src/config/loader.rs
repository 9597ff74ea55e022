//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{GatewayConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Listener port.
pub const ENV_PROXY_PORT: &str = "PROXY_PORT";
/// Listener interface.
pub const ENV_PROXY_BIND_HOST: &str = "PROXY_BIND_HOST";
/// Upstream JSON-RPC endpoint.
pub const ENV_ETHEREUM_NODE_URL: &str = "ETHEREUM_NODE_URL";
pub const ENV_TLS_CERT_PATH: &str = "TLS_CERT_PATH";
pub const ENV_TLS_KEY_PATH: &str = "TLS_KEY_PATH";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
/// Setting this also enables the exporter.
pub const ENV_PROMETHEUS_ADDRESS: &str = "PROMETHEUS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then process
/// environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_PROXY_PORT) {
        config.listener.port = value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
            key: ENV_PROXY_PORT,
            value,
        })?;
    }
    if let Some(value) = lookup(ENV_PROXY_BIND_HOST) {
        config.listener.bind_host = value;
    }
    if let Some(value) = lookup(ENV_ETHEREUM_NODE_URL) {
        config.upstream.url = value;
    }
    if let Some(value) = lookup(ENV_TLS_CERT_PATH) {
        config.tls.cert_path = PathBuf::from(value);
    }
    if let Some(value) = lookup(ENV_TLS_KEY_PATH) {
        config.tls.key_path = PathBuf::from(value);
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = value;
    }
    if let Some(value) = lookup(ENV_LOG_FORMAT) {
        config.observability.log_format = match value.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    key: ENV_LOG_FORMAT,
                    value,
                })
            }
        };
    }
    if let Some(value) = lookup(ENV_PROMETHEUS_ADDRESS) {
        config.observability.prometheus_enabled = true;
        config.observability.prometheus_address = value;
    }
    Ok(())
}
