//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures loading the listener's TLS credential. All are fatal at startup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("TLS file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read TLS file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {0:?}")]
    NoCertificates(PathBuf),

    /// Also returned for passphrase-protected keys, which are not supported.
    #[error("no unencrypted private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("rejected TLS credential: {0}")]
    Rustls(#[source] std::io::Error),
}

/// Load a PEM certificate chain and private key into a rustls server config.
///
/// The key must be unencrypted PKCS#8, PKCS#1 or SEC1. An `ENCRYPTED PRIVATE
/// KEY` block is skipped and reported as `TlsError::NoPrivateKey`.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    let cert_pem = read_pem(cert_path).await?;
    let key_pem = read_pem(key_path).await?;

    let certs = rustls_pemfile::certs(&mut cert_pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            path: cert_path.to_path_buf(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }

    let key = rustls_pemfile::private_key(&mut key_pem.as_slice())
        .map_err(|source| TlsError::Read {
            path: key_path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(key_path.to_path_buf()))?;

    let config = RustlsConfig::from_der(
        certs.iter().map(|cert| cert.to_vec()).collect(),
        key.secret_der().to_vec(),
    )
    .await
    .map_err(TlsError::Rustls)?;

    tracing::debug!(
        cert_path = ?cert_path,
        certificates = certs.len(),
        "TLS credential loaded"
    );
    Ok(config)
}

async fn read_pem(path: &Path) -> Result<Vec<u8>, TlsError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TlsError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(TlsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
