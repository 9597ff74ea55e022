//! TCP listener binding.
//!
//! The listener is bound before the TLS server starts so that bind failures
//! surface as startup errors and tests can use ephemeral ports.

use std::net::{SocketAddr, TcpListener};
use thiserror::Error;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the configured address.
pub fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address = config.bind_address();
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| ListenerError::InvalidAddress(address))?;
    bind_addr(addr)
}

/// Bind `addr` as a non-blocking listener, ready for the async server.
pub fn bind_addr(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    let listener = TcpListener::bind(addr)
        .and_then(|listener| {
            listener.set_nonblocking(true)?;
            Ok(listener)
        })
        .map_err(|source| ListenerError::Bind { addr, source })?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(addr),
        "Listener bound"
    );
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_ephemeral() {
        let config = ListenerConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 0,
            ..ListenerConfig::default()
        };
        let listener = bind(&config).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_port_in_use() {
        let first = bind_addr("127.0.0.1:0".parse().unwrap()).unwrap();
        let taken = first.local_addr().unwrap();

        let err = bind_addr(taken).unwrap_err();
        assert!(matches!(err, ListenerError::Bind { .. }));
    }

    #[test]
    fn test_invalid_host() {
        let config = ListenerConfig {
            bind_host: "not-a-host".to_string(),
            ..ListenerConfig::default()
        };
        assert!(matches!(bind(&config), Err(ListenerError::InvalidAddress(_))));
    }
}
