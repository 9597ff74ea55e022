//! Process lifecycle: bring the gateway up, bring it down cleanly.
//!
//! ```text
//! launch (startup.rs)
//!     [prometheus exporter] → PEM credential → bind → HttpServer::run
//!
//! wait_for_termination (signals.rs)
//!     SIGINT | SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs)
//!     broadcast → axum-server handle → stop accepting, drain for 10s
//! ```
//!
//! Every startup failure is returned as a `StartupError` and ends the
//! process; nothing is retried.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{launch, StartupError};
