//! # State Snapshot Store
//!
//! Holds the latest `ChainStatus` and `L1Status` as one immutable snapshot.
//! Every update publishes a whole new snapshot with an atomic pointer swap,
//! so a reader sees either the old or the new value, never a mix.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use shared_types::{ChainStatus, L1Status};
use std::sync::Arc;
use tracing::debug;

use crate::error::IngestError;

/// A consistent view of the node's status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Client view of the L2 chain.
    pub client: ChainStatus,
    /// L1 reader status.
    pub l1: L1Status,
    /// Incremented on every published update.
    pub version: u64,
}

/// Single-writer, many-reader store of the current `StatusSnapshot`.
pub struct StatusStore {
    current: ArcSwap<StatusSnapshot>,
    writer: Mutex<()>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::with_initial(StatusSnapshot::default())
    }

    pub fn with_initial(snapshot: StatusSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
            writer: Mutex::new(()),
        }
    }

    /// Current snapshot. Lock-free.
    pub fn get(&self) -> Arc<StatusSnapshot> {
        self.current.load_full()
    }

    /// Replace the client status.
    ///
    /// Rejects updates that move `chain_tip_slot` or `buried_l1_height`
    /// backwards; the stored snapshot is left untouched in that case.
    /// Returns the version of the published snapshot.
    pub fn update_client(&self, status: ChainStatus) -> Result<u64, IngestError> {
        let _guard = self.writer.lock();
        let prev = self.current.load_full();

        if status.chain_tip_slot < prev.client.chain_tip_slot {
            return Err(IngestError::SlotRegression {
                current: prev.client.chain_tip_slot,
                proposed: status.chain_tip_slot,
            });
        }
        if status.buried_l1_height < prev.client.buried_l1_height {
            return Err(IngestError::BuriedHeightRegression {
                current: prev.client.buried_l1_height,
                proposed: status.buried_l1_height,
            });
        }

        let next = StatusSnapshot {
            client: status,
            l1: prev.l1.clone(),
            version: prev.version + 1,
        };
        let version = next.version;
        self.current.store(Arc::new(next));
        debug!(version, "published client status");
        Ok(version)
    }

    /// Replace the L1 reader status. Returns the published version.
    pub fn update_l1(&self, l1: L1Status) -> u64 {
        let _guard = self.writer.lock();
        let prev = self.current.load_full();
        let next = StatusSnapshot {
            client: prev.client.clone(),
            l1,
            version: prev.version + 1,
        };
        let version = next.version;
        self.current.store(Arc::new(next));
        debug!(version, "published L1 status");
        version
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}
