//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use status_store::StoreConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Chain parameters reported over RPC
    pub chain: ChainConfig,
    /// Retention bounds for the in-memory indices
    pub retention: StoreConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.chain.block_time_ms == 0 {
            return Err(ConfigError::InvalidChain("block_time_ms cannot be 0".into()));
        }
        if self.chain.network.trim().is_empty() {
            return Err(ConfigError::InvalidChain("network cannot be empty".into()));
        }

        if self.retention.max_headers == 0 {
            return Err(ConfigError::InvalidRetention(
                "max_headers cannot be 0".into(),
            ));
        }
        if self.retention.max_l1_blocks == 0 {
            return Err(ConfigError::InvalidRetention(
                "max_l1_blocks cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8432, 0 picks a free port)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8432,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 1MB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 1024 * 1024,
        }
    }
}

/// Chain parameters served by `strata_protocolVersion`, `strata_blockTime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub protocol_version: u64,
    /// Target milliseconds between L2 blocks
    pub block_time_ms: u64,
    /// Bitcoin network name
    pub network: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            protocol_version: 1,
            block_time_ms: 5_000,
            network: "signet".to_string(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache, seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
            max_age: 86400,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid chain parameters: {0}")]
    InvalidChain(String),
    #[error("invalid retention: {0}")]
    InvalidRetention(String),
}
