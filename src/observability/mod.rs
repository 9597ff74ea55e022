//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler produces:
//!     → registry.rs (per-method call counts, served at /metrics)
//!     → metrics.rs (Prometheus counters and histograms, optional)
//!     → logging.rs (structured log events)
//! ```
//!
//! # Design Decisions
//! - Counting is cheap: a shard lookup plus an atomic increment
//! - The registry is owned by the server and injected into handlers
//! - Request ID flows through log lines

pub mod logging;
pub mod metrics;
pub mod registry;

pub use registry::MethodRegistry;
