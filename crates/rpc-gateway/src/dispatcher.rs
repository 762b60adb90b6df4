//! # RPC Dispatcher
//!
//! Turns a raw request body into a raw response body:
//!
//! ```text
//! bytes ─► parse ─► envelope ─► lookup ─► param schema ─► handler
//!            │          │          │            │            │
//!         -32700     -32600     -32601       -32602       -32603 / -32001
//! ```
//!
//! `handle` never fails and never panics past its boundary: every outcome,
//! including a panicking handler, becomes a well-formed JSON-RPC response.

use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::error::{ApiError, HandlerError};
use crate::domain::methods::{MethodDescriptor, MethodRegistry};
use crate::domain::types::{JsonRpcId, Params, RpcRequest, RpcResponse, JSONRPC_VERSION};
use crate::middleware::metrics::{GatewayMetrics, RequestTimer};
use crate::rpc::StrataRpc;

/// Serialized fallback used only if a response cannot be encoded.
const INTERNAL_ERROR_BODY: &[u8] =
    br#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#;

/// Stateless request dispatcher over an immutable method table.
pub struct RpcDispatcher<C = StrataRpc> {
    registry: MethodRegistry<C>,
    context: C,
    metrics: Arc<GatewayMetrics>,
}

impl<C> RpcDispatcher<C> {
    pub fn new(registry: MethodRegistry<C>, context: C, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            registry,
            context,
            metrics,
        }
    }

    pub fn registry(&self) -> &MethodRegistry<C> {
        &self.registry
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Handle one request body and return the encoded response.
    pub fn handle(&self, body: &[u8]) -> Vec<u8> {
        let response = self.dispatch(body);
        serde_json::to_vec(&response).unwrap_or_else(|e| {
            error!(error = %e, "Failed to encode response");
            INTERNAL_ERROR_BODY.to_vec()
        })
    }

    /// Handle one request body and return the response envelope.
    pub fn dispatch(&self, body: &[u8]) -> RpcResponse {
        let timer = RequestTimer::new(Arc::clone(&self.metrics));

        let response = match parse_request(body) {
            Ok(request) => match self.call(&request) {
                Ok(result) => RpcResponse::success(request.id, result),
                Err(err) => RpcResponse::failure(Some(request.id), err),
            },
            Err((id, err)) => {
                debug!(code = err.code, message = %err.message, "Rejected request envelope");
                RpcResponse::failure(id, err)
            }
        };

        timer.finish(response.error.as_ref());
        response
    }

    fn call(&self, request: &RpcRequest) -> Result<Value, ApiError> {
        let method = request.method.as_str();
        let descriptor = self.registry.lookup(method).ok_or_else(|| {
            debug!(method, "Unknown method");
            ApiError::method_not_found(method)
        })?;

        descriptor.check_params(&request.params).map_err(|why| {
            debug!(method, reason = %why, "Invalid params");
            ApiError::invalid_params(why)
        })?;

        self.invoke(descriptor, request)
    }

    fn invoke(
        &self,
        descriptor: &MethodDescriptor<C>,
        request: &RpcRequest,
    ) -> Result<Value, ApiError> {
        let method = descriptor.name;
        let params = Params::new(&request.params);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            (descriptor.handler)(&self.context, params)
        }));

        match outcome {
            Ok(Ok(value)) => {
                debug!(method, id = %request.id, "Request served");
                Ok(value)
            }
            Ok(Err(err)) => {
                match &err {
                    HandlerError::NotFound(_) | HandlerError::InvalidParams(_) => {
                        debug!(method, error = %err, "Handler rejected request");
                    }
                    HandlerError::Query(_) | HandlerError::Serialization(_) => {
                        error!(method, error = %err, "Handler failed");
                    }
                }
                Err(err.to_api_error())
            }
            Err(payload) => {
                self.metrics.record_panic();
                error!(method, panic = %panic_message(payload.as_ref()), "Handler panicked");
                Err(ApiError::internal())
            }
        }
    }
}

/// Parse and validate an envelope.
///
/// On failure returns the request id when it could be read, so the error
/// response can echo it.
pub fn parse_request(body: &[u8]) -> Result<RpcRequest, (Option<JsonRpcId>, ApiError)> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| (None, ApiError::parse_error(e.to_string())))?;

    let obj = match value {
        Value::Object(obj) => obj,
        Value::Array(_) => {
            return Err((
                None,
                ApiError::invalid_request("batch requests are not supported"),
            ))
        }
        _ => {
            return Err((
                None,
                ApiError::invalid_request("request must be a JSON object"),
            ))
        }
    };

    let id = parse_id(&obj).map_err(|why| (None, ApiError::invalid_request(why)))?;
    let (method, params) =
        validate_envelope(obj).map_err(|why| (Some(id.clone()), ApiError::invalid_request(why)))?;

    Ok(RpcRequest { method, params, id })
}

fn parse_id(obj: &Map<String, Value>) -> Result<JsonRpcId, &'static str> {
    let raw = match obj.get("id") {
        None | Some(Value::Null) => return Err("missing id (notifications are not supported)"),
        Some(raw) => raw,
    };
    JsonRpcId::from_value(raw).ok_or("id must be an integer or a string")
}

/// Check `jsonrpc`, `method` and `params`; yields the method name and params.
fn validate_envelope(mut obj: Map<String, Value>) -> Result<(String, Vec<Value>), &'static str> {
    match obj.get("jsonrpc") {
        Some(Value::String(v)) if v == JSONRPC_VERSION => {}
        Some(_) => return Err("jsonrpc must be \"2.0\""),
        None => return Err("missing jsonrpc field"),
    }

    let method = match obj.remove("method") {
        Some(Value::String(method)) => {
            if method.is_empty() {
                return Err("method cannot be empty");
            }
            if method.len() > 256 {
                return Err("method name too long");
            }
            method
        }
        Some(_) => return Err("method must be a string"),
        None => return Err("missing method field"),
    };

    let params = match obj.remove("params") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(params)) => params,
        Some(_) => return Err("params must be an array"),
    };

    Ok((method, params))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
