//! # strata-status-node
//!
//! Serves the `strata_*` JSON-RPC status methods over HTTP.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging from `STRATA_LOG_LEVEL`/`RUST_LOG`
//! 2. Load configuration (defaults, `STRATA_CONFIG` file, `STRATA_*` overrides)
//! 3. Start the RPC service and, if enabled, the dev follower
//! 4. Run until Ctrl+C, then shut down gracefully

use anyhow::{Context, Result};
use node_runtime::{NodeConfig, NodeRuntime};
use node_telemetry::{init_tracing, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_tracing(&telemetry).context("failed to initialize logging")?;
    info!(
        service = %telemetry.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting node"
    );

    let config = NodeConfig::from_env().context("failed to load configuration")?;

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
    }

    runtime.shutdown().await
}
