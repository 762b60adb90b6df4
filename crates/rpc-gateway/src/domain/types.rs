//! JSON-RPC envelope types.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use shared_types::Buf32;
use std::fmt;

use crate::domain::error::{ApiError, HandlerError};

/// Protocol version string carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request ID type
///
/// Echoed back verbatim. Null ids denote notifications, which this server
/// does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// Any JSON integer, signed or unsigned
    Number(Number),
    String(String),
}

impl JsonRpcId {
    /// Convert a raw `id` member, if it has an acceptable type.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(JsonRpcId::Number(n.clone())),
            Value::String(s) => Some(JsonRpcId::String(s.clone())),
            _ => None,
        }
    }
}

impl From<u64> for JsonRpcId {
    fn from(n: u64) -> Self {
        JsonRpcId::Number(n.into())
    }
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "\"{}\"", s),
            JsonRpcId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A validated request envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    /// Positional params. Absent or `null` params become empty.
    pub params: Vec<Value>,
    pub id: JsonRpcId,
}

/// Response envelope. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    /// `None` serializes as `null` when the request id could not be read.
    pub id: Option<JsonRpcId>,
}

impl RpcResponse {
    pub fn success(id: JsonRpcId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    pub fn failure(id: Option<JsonRpcId>, error: ApiError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// Positional params after schema validation.
///
/// Accessors still return `HandlerError` rather than panicking, so a
/// handler registered with the wrong schema fails as a client error.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    values: &'a [Value],
}

impl<'a> Params<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn u64(&self, index: usize) -> Result<u64, HandlerError> {
        self.values
            .get(index)
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                HandlerError::InvalidParams(format!(
                    "parameter {} must be a non-negative integer",
                    index
                ))
            })
    }

    pub fn buf32(&self, index: usize) -> Result<Buf32, HandlerError> {
        let raw = self.values.get(index).and_then(Value::as_str).ok_or_else(|| {
            HandlerError::InvalidParams(format!("parameter {} must be a hex string", index))
        })?;
        raw.parse()
            .map_err(|e| HandlerError::InvalidParams(format!("parameter {}: {}", index, e)))
    }
}
