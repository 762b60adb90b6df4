//! # Ports
//!
//! `StatusQuery` is the read side consumed by RPC handlers.
//! `StatusIngest` is the write side driven by the chain follower.

use shared_types::{BlockHeader, Buf32, ChainStatus, L1Status};
use std::sync::Arc;

use crate::error::{IngestError, QueryError};
use crate::l1_index::L1Record;
use crate::snapshot::StatusSnapshot;

/// Read-only view of node status.
pub trait StatusQuery: Send + Sync {
    /// Current consistent status snapshot.
    fn snapshot(&self) -> Result<Arc<StatusSnapshot>, QueryError>;

    /// Up to `count` newest headers, newest first.
    fn recent_headers(&self, count: usize) -> Result<Vec<BlockHeader>, QueryError>;

    fn header_at(&self, idx: u64) -> Result<Option<BlockHeader>, QueryError>;

    fn header_by_id(&self, id: &Buf32) -> Result<Option<BlockHeader>, QueryError>;

    fn l1_block_hash(&self, height: u64) -> Result<Option<Buf32>, QueryError>;
}

/// Ingestion API for the chain follower and L1 reader.
pub trait StatusIngest: Send + Sync {
    fn update_status(&self, status: ChainStatus) -> Result<(), IngestError>;

    fn update_l1_status(&self, status: L1Status) -> Result<(), IngestError>;

    fn append_header(&self, header: BlockHeader) -> Result<(), IngestError>;

    fn record_l1_block(&self, height: u64, hash: Buf32) -> Result<L1Record, IngestError>;
}
