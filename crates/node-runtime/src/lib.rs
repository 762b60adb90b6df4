//! # Node Runtime
//!
//! Owns the node state and runs the RPC service plus, when enabled, the dev
//! follower. The `strata-status-node` binary is a thin shell over
//! [`NodeRuntime`].
//!
//! ## Startup Sequence
//!
//! 1. Load [`NodeConfig`] (defaults, `STRATA_CONFIG` file, env overrides)
//! 2. Build `NodeState` with the configured retention
//! 3. Bind the RPC service
//! 4. Spawn the dev follower if enabled
//!
//! Shutdown runs in reverse: the follower stops first, then the RPC server
//! drains in-flight requests.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod devnet;

pub use config::{ConfigError, NodeConfig};
pub use devnet::{DevFollower, DevFollowerConfig};

use anyhow::{Context, Result};
use rpc_gateway::RpcService;
use status_store::NodeState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running node: state, RPC service and background tasks.
pub struct NodeRuntime {
    config: NodeConfig,
    state: Arc<NodeState>,
    rpc: RpcService,
    follower: Option<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("invalid node configuration")?;
        let state = Arc::new(NodeState::with_network(
            &config.gateway.retention,
            config.gateway.chain.network.clone(),
        ));
        let rpc = RpcService::new(config.gateway.clone(), state.clone())
            .context("failed to build RPC service")?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            state,
            rpc,
            follower: None,
            shutdown_tx,
        })
    }

    /// Bind the RPC listener and spawn background tasks.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        let addr = self
            .rpc
            .start()
            .await
            .context("failed to start RPC service")?;

        if self.config.dev_follower.enabled && self.follower.is_none() {
            let follower = DevFollower::new(
                self.state.clone(),
                self.config.dev_follower.clone(),
                self.config.gateway.chain.network.clone(),
            );
            let block_time = Duration::from_millis(self.config.gateway.chain.block_time_ms);
            self.follower = Some(tokio::spawn(
                follower.run(block_time, self.shutdown_tx.subscribe()),
            ));
        }

        info!(
            addr = %addr,
            network = %self.config.gateway.chain.network,
            dev_follower = self.config.dev_follower.enabled,
            "Node started"
        );
        Ok(addr)
    }

    /// Stop the follower, then drain and stop the RPC server.
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Initiating graceful shutdown");
        self.shutdown_tx.send_replace(true);

        if let Some(follower) = self.follower.take() {
            if let Err(e) = follower.await {
                error!(error = %e, "Dev follower task failed");
            }
        }

        self.rpc
            .shutdown()
            .await
            .context("RPC service did not shut down cleanly")?;
        info!("Shutdown complete");
        Ok(())
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.rpc.local_addr()
    }

    /// Shared node state, for ingestion from outside the runtime.
    pub fn state(&self) -> Arc<NodeState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}
