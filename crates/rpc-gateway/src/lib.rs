//! # RPC Gateway
//!
//! JSON-RPC 2.0 over HTTP for the node status service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      RPC GATEWAY                         │
//! ├──────────────────────────────────────────────────────────┤
//! │   POST /        GET /health        GET /metrics          │
//! │      │                                                   │
//! │  ┌───┴──────────────────────────────────────┐            │
//! │  │  Middleware: CORS → BodyLimit → Tracing  │            │
//! │  └───┬──────────────────────────────────────┘            │
//! │      │                                                   │
//! │  ┌───┴───────────┐     ┌──────────────────┐              │
//! │  │ RpcDispatcher │────►│  MethodRegistry  │              │
//! │  └───┬───────────┘     └──────────────────┘              │
//! │      │                                                   │
//! │  ┌───┴───────────┐                                       │
//! │  │   StrataRpc   │  strata_* handlers                    │
//! │  └───┬───────────┘                                       │
//! └──────┼───────────────────────────────────────────────────┘
//!        │ StatusQuery (read-only)
//!        ▼
//!   status-store::NodeState
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use rpc_gateway::{GatewayConfig, RpcService};
//! use status_store::NodeState;
//!
//! let config = GatewayConfig::default();
//! let state = Arc::new(NodeState::with_network(&config.retention, config.chain.network.clone()));
//! let mut service = RpcService::new(config, state)?;
//! let addr = service.start().await?;
//! // ...
//! service.shutdown().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod dispatcher;
pub mod domain;
pub mod middleware;
pub mod rpc;
pub mod service;

// Re-exports for public API
pub use dispatcher::{parse_request, RpcDispatcher};
pub use domain::config::GatewayConfig;
pub use domain::error::{codes, ApiError, GatewayError, HandlerError, RegistryError};
pub use domain::methods::{MethodDescriptor, MethodRegistry, ParamKind};
pub use domain::types::{JsonRpcId, Params, RpcRequest, RpcResponse};
pub use middleware::GatewayMetrics;
pub use rpc::{strata_registry, StrataRpc};
pub use service::RpcService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
