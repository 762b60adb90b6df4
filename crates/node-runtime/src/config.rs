//! # Node Configuration
//!
//! Built in three layers: defaults, then an optional JSON file named by
//! `STRATA_CONFIG`, then individual `STRATA_*` environment overrides.

use rpc_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::devnet::DevFollowerConfig;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// RPC gateway configuration.
    pub gateway: GatewayConfig,
    /// Synthetic chain follower for development.
    pub dev_follower: DevFollowerConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },

    #[error("invalid dev follower settings: {0}")]
    InvalidDevFollower(String),

    #[error(transparent)]
    Gateway(#[from] rpc_gateway::domain::ConfigError),
}

impl NodeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("STRATA_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the gateway and dev follower sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        self.dev_follower.validate(self.gateway.retention.max_headers)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    fn apply_overrides(
        &mut self,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let gateway = &mut self.gateway;
        override_var(lookup, "STRATA_RPC_HOST", &mut gateway.http.host)?;
        override_var(lookup, "STRATA_RPC_PORT", &mut gateway.http.port)?;
        override_var(lookup, "STRATA_BLOCK_TIME_MS", &mut gateway.chain.block_time_ms)?;
        override_var(
            lookup,
            "STRATA_PROTOCOL_VERSION",
            &mut gateway.chain.protocol_version,
        )?;
        override_var(lookup, "STRATA_NETWORK", &mut gateway.chain.network)?;
        override_var(lookup, "STRATA_MAX_HEADERS", &mut gateway.retention.max_headers)?;
        override_var(
            lookup,
            "STRATA_MAX_L1_BLOCKS",
            &mut gateway.retention.max_l1_blocks,
        )?;
        override_var(
            lookup,
            "STRATA_MAX_REQUEST_SIZE",
            &mut gateway.limits.max_request_size,
        )?;

        if let Some(raw) = lookup("STRATA_DEV_FOLLOWER") {
            self.dev_follower.enabled = node_telemetry::parse_flag(&raw);
        }
        Ok(())
    }
}

fn override_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(var) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value })?;
    }
    Ok(())
}
