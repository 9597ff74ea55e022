//! JSON-RPC request handling.
//!
//! # Data Flow
//! ```text
//! raw body bytes
//!     → payload.rs (parse, structural validation)
//!     → RpcPayload::Single | RpcPayload::Batch
//!     → tracked per request, forwarded as one unit
//! ```

pub mod payload;

pub use payload::{JsonRpcRequest, RpcPayload};
