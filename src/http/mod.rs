//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection
//!     → server.rs (Axum setup, routing by path)
//!     → request.rs (request ID, client address)
//!     → rpc.rs (validate → track → forward) | metrics.rs (registry snapshot)
//!     → response.rs (passthrough or JSON-RPC error body)
//!     → Send to client
//! ```

pub mod metrics;
pub mod request;
pub mod response;
pub mod rpc;
pub mod server;

pub use request::{ClientAddr, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
