//! TLS-terminating JSON-RPC gateway library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod rpc;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::MethodRegistry;
pub use rpc::RpcPayload;
pub use upstream::{ForwardError, UpstreamForwarder};
