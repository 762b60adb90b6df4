//! Middleware stack for the gateway.
//!
//! Layer order (outermost first): CORS → body limit → tracing → handler.
//! Dispatcher metrics are recorded inside the handler, not as a layer.

pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::{GatewayMetrics, RequestTimer};
pub use tracing::TracingLayer;
