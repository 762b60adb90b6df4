//! # Node State
//!
//! Owns the status store and both indices, and is the single entry point
//! for ingestion. Ingestion failures are logged here and never reach RPC
//! clients; a chain discontinuity latches a halt flag so the index keeps
//! serving its last consistent window instead of accepting a broken chain.

use serde::{Deserialize, Serialize};
use shared_types::{BlockHeader, Buf32, ChainStatus, L1Status};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{IngestError, QueryError};
use crate::header_index::HeaderIndex;
use crate::l1_index::{L1BlockIndex, L1Record};
use crate::ports::{StatusIngest, StatusQuery};
use crate::snapshot::{StatusSnapshot, StatusStore};

/// Retention bounds for the in-memory indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Max L2 headers kept in the header index.
    pub max_headers: usize,
    /// Max L1 block hashes kept in the L1 index.
    pub max_l1_blocks: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_headers: 1024,
            max_l1_blocks: 4096,
        }
    }
}

/// Status stores plus ingestion bookkeeping.
pub struct NodeState {
    status: StatusStore,
    headers: HeaderIndex,
    l1_blocks: L1BlockIndex,
    halted: AtomicBool,
}

impl NodeState {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_network(config, L1Status::default().network)
    }

    /// State whose pre-ingestion L1 status reports `network`.
    pub fn with_network(config: &StoreConfig, network: impl Into<String>) -> Self {
        let l1 = L1Status {
            network: network.into(),
            ..L1Status::default()
        };
        info!(
            max_headers = config.max_headers,
            max_l1_blocks = config.max_l1_blocks,
            network = %l1.network,
            "Initializing node state"
        );
        Self {
            status: StatusStore::with_initial(StatusSnapshot {
                l1,
                ..StatusSnapshot::default()
            }),
            headers: HeaderIndex::new(config.max_headers),
            l1_blocks: L1BlockIndex::new(config.max_l1_blocks),
            halted: AtomicBool::new(false),
        }
    }

    pub fn shared(config: &StoreConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Whether header ingestion stopped after a discontinuity.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }
}

impl StatusIngest for NodeState {
    fn update_status(&self, status: ChainStatus) -> Result<(), IngestError> {
        if status.finalized_blkid != status.chain_tip
            && self
                .headers
                .is_ancestor_or_equal(&status.finalized_blkid, &status.chain_tip)
                == Some(false)
        {
            let err = IngestError::FinalizedNotAncestor {
                finalized: status.finalized_blkid,
                tip: status.chain_tip,
            };
            error!(error = %err, "Rejected client status update");
            return Err(err);
        }

        let slot = status.chain_tip_slot;
        match self.status.update_client(status) {
            Ok(version) => {
                debug!(version, slot, "Client status updated");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Rejected client status update");
                Err(err)
            }
        }
    }

    fn update_l1_status(&self, status: L1Status) -> Result<(), IngestError> {
        if !status.bitcoin_rpc_connected {
            warn!(height = status.cur_height, "L1 reader reports bitcoin RPC disconnected");
        }
        let version = self.status.update_l1(status);
        debug!(version, "L1 status updated");
        Ok(())
    }

    fn append_header(&self, header: BlockHeader) -> Result<(), IngestError> {
        if self.is_halted() {
            return Err(IngestError::IngestionHalted);
        }

        let block_idx = header.block_idx;
        match self.headers.append(header) {
            Ok(()) => {
                debug!(block_idx, "Header appended");
                Ok(())
            }
            Err(err) => {
                if err.is_fatal() {
                    self.halted.store(true, Ordering::Release);
                    error!(
                        error = %err,
                        "Chain discontinuity, halting header ingestion; \
                         RPC keeps serving last consistent index"
                    );
                }
                Err(err)
            }
        }
    }

    fn record_l1_block(&self, height: u64, hash: Buf32) -> Result<L1Record, IngestError> {
        let outcome = self.l1_blocks.record(height, hash);
        if let L1Record::Reorged { dropped } = outcome {
            warn!(height, dropped, "L1 reorg, dropped stale block hashes");
        }
        Ok(outcome)
    }
}

impl StatusQuery for NodeState {
    fn snapshot(&self) -> Result<Arc<StatusSnapshot>, QueryError> {
        Ok(self.status.get())
    }

    fn recent_headers(&self, count: usize) -> Result<Vec<BlockHeader>, QueryError> {
        Ok(self.headers.recent(count))
    }

    fn header_at(&self, idx: u64) -> Result<Option<BlockHeader>, QueryError> {
        Ok(self.headers.at_index(idx))
    }

    fn header_by_id(&self, id: &Buf32) -> Result<Option<BlockHeader>, QueryError> {
        Ok(self.headers.by_id(id))
    }

    fn l1_block_hash(&self, height: u64) -> Result<Option<Buf32>, QueryError> {
        Ok(self.l1_blocks.get(height))
    }
}
