//! Upstream JSON-RPC node access.
//!
//! A single upstream, no retries, no load balancing. The forwarder's slot
//! semaphore is the only backpressure in the system.

pub mod forwarder;

pub use forwarder::{ForwardError, UpstreamForwarder};
