//! # Node Telemetry
//!
//! Structured logging for the node status service, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use node_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_tracing(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STRATA_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `STRATA_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `STRATA_SERVICE_NAME` | `strata-status-node` | Service name |
//! | `NO_COLOR` | unset | Disable ANSI colors |

mod config;
mod tracing_setup;

pub use config::{parse_flag, TelemetryConfig};
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
