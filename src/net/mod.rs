//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → listener.rs (bind address, fail fast)
//!     → tls.rs (load PEM certificate chain and key)
//!     → Hand off to the HTTPS server
//! ```

pub mod listener;
pub mod tls;

pub use tls::{load_tls_config, TlsError};
