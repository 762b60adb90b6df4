//! `strata_*` JSON-RPC methods.
//!
//! Every method is a synchronous read of the status store. Nothing here
//! mutates node state.

use serde_json::Value;
use shared_types::{BlockHeader, Buf32, ChainStatus, L1Status, SyncStatus};
use status_store::StatusQuery;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::config::ChainConfig;
use crate::domain::error::{HandlerError, RegistryError};
use crate::domain::methods::{MethodDescriptor, MethodRegistry, ParamKind};
use crate::domain::types::Params;

/// Handler context for the `strata` namespace.
pub struct StrataRpc {
    state: Arc<dyn StatusQuery>,
    protocol_version: u64,
    block_time_ms: u64,
}

impl StrataRpc {
    pub fn new(state: Arc<dyn StatusQuery>, chain: &ChainConfig) -> Self {
        Self {
            state,
            protocol_version: chain.protocol_version,
            block_time_ms: chain.block_time_ms,
        }
    }

    /// strata_protocolVersion
    pub fn protocol_version(&self) -> u64 {
        self.protocol_version
    }

    /// strata_blockTime - target ms between L2 blocks
    pub fn block_time(&self) -> u64 {
        self.block_time_ms
    }

    /// strata_l1connected
    #[instrument(skip(self))]
    pub fn l1_connected(&self) -> Result<bool, HandlerError> {
        Ok(self.state.snapshot()?.l1.bitcoin_rpc_connected)
    }

    /// strata_l1status
    #[instrument(skip(self))]
    pub fn l1_status(&self) -> Result<L1Status, HandlerError> {
        Ok(self.state.snapshot()?.l1.clone())
    }

    /// strata_getL1blockHash
    #[instrument(skip(self))]
    pub fn l1_block_hash(&self, height: u64) -> Result<Buf32, HandlerError> {
        self.state
            .l1_block_hash(height)?
            .ok_or_else(|| HandlerError::NotFound(format!("L1 block at height {}", height)))
    }

    /// strata_clientStatus
    #[instrument(skip(self))]
    pub fn client_status(&self) -> Result<ChainStatus, HandlerError> {
        Ok(self.state.snapshot()?.client.clone())
    }

    /// strata_syncStatus
    #[instrument(skip(self))]
    pub fn sync_status(&self) -> Result<SyncStatus, HandlerError> {
        let snapshot = self.state.snapshot()?;
        Ok(SyncStatus::from(&snapshot.client))
    }

    /// strata_getRecentBlockHeaders - newest first, at most `count`
    #[instrument(skip(self))]
    pub fn recent_block_headers(&self, count: u64) -> Result<Vec<BlockHeader>, HandlerError> {
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        let headers = self.state.recent_headers(count)?;
        debug!(returned = headers.len(), "Served recent headers");
        Ok(headers)
    }

    /// strata_getHeadersAtIdx
    #[instrument(skip(self))]
    pub fn headers_at_idx(&self, idx: u64) -> Result<Vec<BlockHeader>, HandlerError> {
        self.state
            .header_at(idx)?
            .map(|header| vec![header])
            .ok_or_else(|| HandlerError::NotFound(format!("block header at index {}", idx)))
    }

    /// strata_getHeaderById
    #[instrument(skip(self), fields(block_id = %block_id))]
    pub fn header_by_id(&self, block_id: Buf32) -> Result<BlockHeader, HandlerError> {
        self.state
            .header_by_id(&block_id)?
            .ok_or_else(|| HandlerError::NotFound(format!("block {}", block_id)))
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, HandlerError> {
    Ok(serde_json::to_value(value)?)
}

fn protocol_version(rpc: &StrataRpc, _: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.protocol_version())
}

fn block_time(rpc: &StrataRpc, _: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.block_time())
}

fn l1_connected(rpc: &StrataRpc, _: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.l1_connected()?)
}

fn l1_status(rpc: &StrataRpc, _: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.l1_status()?)
}

fn get_l1_block_hash(rpc: &StrataRpc, params: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.l1_block_hash(params.u64(0)?)?)
}

fn client_status(rpc: &StrataRpc, _: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.client_status()?)
}

fn sync_status(rpc: &StrataRpc, _: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.sync_status()?)
}

fn get_recent_block_headers(rpc: &StrataRpc, params: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.recent_block_headers(params.u64(0)?)?)
}

fn get_headers_at_idx(rpc: &StrataRpc, params: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.headers_at_idx(params.u64(0)?)?)
}

fn get_header_by_id(rpc: &StrataRpc, params: Params<'_>) -> Result<Value, HandlerError> {
    to_value(rpc.header_by_id(params.buf32(0)?)?)
}

/// Method table for the `strata` namespace.
pub const STRATA_METHODS: &[MethodDescriptor<StrataRpc>] = &[
    MethodDescriptor::new(
        "strata_protocolVersion",
        &[],
        protocol_version,
        "Protocol version of this node",
    ),
    MethodDescriptor::new(
        "strata_blockTime",
        &[],
        block_time,
        "Target milliseconds between L2 blocks",
    ),
    MethodDescriptor::new(
        "strata_l1connected",
        &[],
        l1_connected,
        "Whether the L1 reader reaches its bitcoin node",
    ),
    MethodDescriptor::new("strata_l1status", &[], l1_status, "Current L1 reader status"),
    MethodDescriptor::new(
        "strata_getL1blockHash",
        &[ParamKind::U64],
        get_l1_block_hash,
        "Hash of the L1 block at a height",
    ),
    MethodDescriptor::new(
        "strata_clientStatus",
        &[],
        client_status,
        "Client view of chain tip, finality and L1 anchor",
    ),
    MethodDescriptor::new(
        "strata_syncStatus",
        &[],
        sync_status,
        "Tip height, tip id and finalized id",
    ),
    MethodDescriptor::new(
        "strata_getRecentBlockHeaders",
        &[ParamKind::U64],
        get_recent_block_headers,
        "Up to N most recent block headers, newest first",
    ),
    MethodDescriptor::new(
        "strata_getHeadersAtIdx",
        &[ParamKind::U64],
        get_headers_at_idx,
        "Block headers at an L2 height",
    ),
    MethodDescriptor::new(
        "strata_getHeaderById",
        &[ParamKind::Buf32],
        get_header_by_id,
        "Block header with a given block id",
    ),
];

/// Build the registry with every `strata_*` method.
pub fn strata_registry() -> Result<MethodRegistry<StrataRpc>, RegistryError> {
    let mut registry = MethodRegistry::new();
    for descriptor in STRATA_METHODS {
        registry.register(*descriptor)?;
    }
    Ok(registry)
}
