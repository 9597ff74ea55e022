//! JSON-RPC payload parsing and structural validation.
//!
//! Only the `method` field is ever typed. `jsonrpc`, `params` and `id` pass
//! through untouched: object keys keep their order and numbers keep their
//! original text, however large or precise.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// A parsed `/rpc` body. Shape is preserved when forwarding upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RpcPayload {
    /// A single request object.
    Single(Value),
    /// An array of requests, in client order.
    Batch(Vec<Value>),
}

/// Borrowed view over a request object that carries a valid `method`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsonRpcRequest<'a> {
    pub method: &'a str,
    pub id: Option<&'a Value>,
}

impl<'a> JsonRpcRequest<'a> {
    /// View a request object, rejecting it when `method` is absent, not a
    /// string, or empty.
    pub fn view(object: &'a Map<String, Value>) -> Result<Self, GatewayError> {
        match object.get("method") {
            Some(Value::String(method)) if !method.is_empty() => Ok(Self {
                method,
                id: object.get("id"),
            }),
            _ => Err(GatewayError::MissingMethod),
        }
    }
}

impl RpcPayload {
    /// Parse and validate a raw request body.
    ///
    /// A batch is rejected as a whole on its first object without a method.
    /// Array elements that are not objects are not validated and still
    /// travel upstream with the rest of the batch.
    pub fn parse(raw: &[u8]) -> Result<Self, GatewayError> {
        let value: Value = serde_json::from_slice(raw).map_err(GatewayError::Parse)?;

        match value {
            Value::Object(ref object) => {
                JsonRpcRequest::view(object)?;
                Ok(RpcPayload::Single(value))
            }
            Value::Array(items) => {
                for item in &items {
                    if let Value::Object(object) = item {
                        JsonRpcRequest::view(object)?;
                    }
                }
                Ok(RpcPayload::Batch(items))
            }
            _ => Err(GatewayError::NotObjectOrArray),
        }
    }

    /// Requests that count as calls: the single object, or every object
    /// element of a batch.
    pub fn requests(&self) -> impl Iterator<Item = JsonRpcRequest<'_>> {
        let items: &[Value] = match self {
            RpcPayload::Single(value) => std::slice::from_ref(value),
            RpcPayload::Batch(items) => items,
        };
        items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|object| JsonRpcRequest::view(object).ok())
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, RpcPayload::Batch(_))
    }

    /// "single" or "batch", for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        if self.is_batch() {
            "batch"
        } else {
            "single"
        }
    }
}
