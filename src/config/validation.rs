//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Returns every problem found,
//! not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream url '{url}' is invalid: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("listener address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("prometheus address '{0}' is not a valid socket address")]
    PrometheusAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason: e.to_string(),
        }),
    }

    let bind_address = config.listener.bind_address();
    if bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(bind_address));
    }

    if config.observability.prometheus_enabled
        && config
            .observability
            .prometheus_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::PrometheusAddress(
            config.observability.prometheus_address.clone(),
        ));
    }

    let non_zero = [
        ("listener.max_body_size", config.listener.max_body_size as u64),
        ("upstream.connect_timeout_secs", config.upstream.connect_timeout_secs),
        ("upstream.request_timeout_secs", config.upstream.request_timeout_secs),
        ("upstream.max_connections", config.upstream.max_connections as u64),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
