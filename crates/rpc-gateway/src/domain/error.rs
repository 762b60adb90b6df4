//! Gateway error types with JSON-RPC 2.0 error codes.

use serde::{Deserialize, Serialize};
use status_store::QueryError;
use std::fmt;

/// JSON-RPC error codes returned by the gateway.
pub mod codes {
    // JSON-RPC 2.0 standard errors (-32700 to -32600)
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Server errors (-32000 to -32099)
    pub const RESOURCE_NOT_FOUND: i32 = -32001;
}

/// Client-facing JSON-RPC error object.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error - body is not valid JSON
    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(
            codes::PARSE_ERROR,
            format!("Parse error: {}", details.into()),
        )
    }

    /// Invalid request - not a valid JSON-RPC envelope
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_REQUEST,
            format!("Invalid request: {}", details.into()),
        )
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_PARAMS,
            format!("Invalid params: {}", details.into()),
        )
    }

    /// Internal error. The message is fixed; details stay in the logs.
    pub fn internal() -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal error")
    }

    /// Resource not found (L1 block, header, etc.)
    pub fn resource_not_found(resource: impl Into<String>) -> Self {
        Self::new(
            codes::RESOURCE_NOT_FOUND,
            format!("Resource not found: {}", resource.into()),
        )
    }

    /// Coarse code class used for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self.code {
            codes::PARSE_ERROR => "parse_error",
            codes::INVALID_REQUEST => "invalid_request",
            codes::METHOD_NOT_FOUND => "method_not_found",
            codes::INVALID_PARAMS => "invalid_params",
            codes::RESOURCE_NOT_FOUND => "resource_not_found",
            _ => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let len = if self.data.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("ApiError", len)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        if let Some(ref data) = self.data {
            state.serialize_field("data", data)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for ApiError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ErrorHelper {
            code: i32,
            message: String,
            data: Option<serde_json::Value>,
        }

        let helper = ErrorHelper::deserialize(deserializer)?;
        Ok(ApiError {
            code: helper.code,
            message: helper.message,
            data: helper.data,
        })
    }
}

/// Failure inside a method handler, mapped to an `ApiError` by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Lookup found nothing (unknown height, index or block id).
    #[error("{0}")]
    NotFound(String),

    /// Parameter passed the schema but is semantically unusable.
    #[error("{0}")]
    InvalidParams(String),

    #[error("status query failed: {0}")]
    Query(#[from] QueryError),

    #[error("result serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    /// Client-facing error. Internal causes are reduced to a generic message.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            Self::NotFound(what) => ApiError::resource_not_found(what.clone()),
            Self::InvalidParams(why) => ApiError::invalid_params(why.clone()),
            Self::Query(_) | Self::Serialization(_) => ApiError::internal(),
        }
    }
}

/// Method registration failure at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("method already registered: {0}")]
    DuplicateMethod(String),
}

/// Gateway-level errors (not JSON-RPC, internal use)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    #[error("method registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("service already started")]
    AlreadyStarted,

    #[error("internal error: {0}")]
    Internal(String),
}
