//! # L1 Block Index
//!
//! Height → hash map of recently observed L1 blocks, used to answer
//! `strata_getL1blockHash`. Recording a height at or below the current tip
//! is treated as an L1 reorg: every entry from that height up is dropped
//! before the new hash is inserted.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use shared_types::Buf32;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of [`L1BlockIndex::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L1Record {
    /// New block on top of the known tip (or first block).
    Extended,
    /// Block replaced existing entries; `dropped` were removed.
    Reorged { dropped: usize },
}

/// Bounded copy-on-write index of L1 block hashes.
pub struct L1BlockIndex {
    retention: usize,
    blocks: ArcSwap<BTreeMap<u64, Buf32>>,
    writer: Mutex<()>,
}

impl L1BlockIndex {
    pub fn new(retention: usize) -> Self {
        Self {
            retention: retention.max(1),
            blocks: ArcSwap::from_pointee(BTreeMap::new()),
            writer: Mutex::new(()),
        }
    }

    pub fn record(&self, height: u64, hash: Buf32) -> L1Record {
        let _guard = self.writer.lock();
        let mut next = (**self.blocks.load()).clone();

        let stale = next.split_off(&height);
        let outcome = if stale.is_empty() {
            L1Record::Extended
        } else {
            L1Record::Reorged {
                dropped: stale.len(),
            }
        };

        next.insert(height, hash);
        while next.len() > self.retention {
            next.pop_first();
        }
        self.blocks.store(Arc::new(next));
        outcome
    }

    pub fn get(&self, height: u64) -> Option<Buf32> {
        self.blocks.load().get(&height).copied()
    }

    /// Highest recorded height and its hash.
    pub fn tip(&self) -> Option<(u64, Buf32)> {
        self.blocks
            .load()
            .last_key_value()
            .map(|(height, hash)| (*height, *hash))
    }

    pub fn len(&self) -> usize {
        self.blocks.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.load().is_empty()
    }
}
