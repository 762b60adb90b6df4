//! Domain types for the gateway: envelopes, errors, the method registry and
//! configuration. Nothing here touches the network.

pub mod config;
pub mod error;
pub mod methods;
pub mod types;

pub use config::{ChainConfig, ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig};
pub use error::{codes, ApiError, GatewayError, HandlerError, RegistryError};
pub use methods::{Handler, MethodDescriptor, MethodRegistry, ParamKind};
pub use types::{JsonRpcId, Params, RpcRequest, RpcResponse, JSONRPC_VERSION};
