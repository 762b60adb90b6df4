//! # Block Header Index
//!
//! Bounded, gap-free history of the most recent L2 block headers.
//!
//! The window is an immutable `VecDeque` behind an `ArcSwap`. `append`
//! copies the window, pushes, evicts past the retention bound and publishes
//! the copy. Readers load the current window without locking.
//!
//! Query order: [`HeaderIndex::recent`] returns headers **newest first**.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use shared_types::{BlockHeader, Buf32};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::IngestError;

/// Retained headers, oldest at the front.
type Window = VecDeque<BlockHeader>;

/// Ring of recent headers with linkage validation on append.
pub struct HeaderIndex {
    retention: usize,
    window: ArcSwap<Window>,
    writer: Mutex<()>,
}

impl HeaderIndex {
    /// Create an empty index keeping at most `retention` headers (minimum 1).
    pub fn new(retention: usize) -> Self {
        Self {
            retention: retention.max(1),
            window: ArcSwap::from_pointee(VecDeque::new()),
            writer: Mutex::new(()),
        }
    }

    /// Append a header on top of the newest one.
    ///
    /// The first header is accepted as the base of the window. Later headers
    /// must link to the newest entry (`prev_block` and `block_idx + 1`),
    /// otherwise `ChainDiscontinuity` is returned and nothing changes.
    pub fn append(&self, header: BlockHeader) -> Result<(), IngestError> {
        let _guard = self.writer.lock();
        let current = self.window.load_full();

        if let Some(newest) = current.back() {
            if !header.extends(newest) {
                return Err(IngestError::ChainDiscontinuity {
                    expected_prev: newest.block_id,
                    expected_idx: newest.block_idx.saturating_add(1),
                    got_prev: header.prev_block,
                    got_idx: header.block_idx,
                });
            }
        }

        let mut next: Window = (*current).clone();
        next.push_back(header);
        while next.len() > self.retention {
            next.pop_front();
        }
        self.window.store(Arc::new(next));
        Ok(())
    }

    /// Up to `count` newest headers, newest first.
    pub fn recent(&self, count: usize) -> Vec<BlockHeader> {
        let window = self.window.load();
        window.iter().rev().take(count).cloned().collect()
    }

    /// Header at L2 height `idx`, if retained.
    pub fn at_index(&self, idx: u64) -> Option<BlockHeader> {
        let window = self.window.load();
        let oldest = window.front()?.block_idx;
        let offset = idx.checked_sub(oldest)?;
        window.get(usize::try_from(offset).ok()?).cloned()
    }

    /// Header with the given block id, if retained.
    pub fn by_id(&self, id: &Buf32) -> Option<BlockHeader> {
        let window = self.window.load();
        window.iter().rev().find(|h| &h.block_id == id).cloned()
    }

    /// Whether `ancestor` is `descendant` or one of its ancestors.
    ///
    /// `None` when either block is outside the retained window.
    pub fn is_ancestor_or_equal(&self, ancestor: &Buf32, descendant: &Buf32) -> Option<bool> {
        let window = self.window.load();
        let desc = window.iter().find(|h| &h.block_id == descendant)?;
        let anc = window.iter().find(|h| &h.block_id == ancestor)?;
        // The window is a single linked chain, so height decides ancestry.
        Some(anc.block_idx <= desc.block_idx)
    }

    pub fn newest(&self) -> Option<BlockHeader> {
        self.window.load().back().cloned()
    }

    pub fn oldest(&self) -> Option<BlockHeader> {
        self.window.load().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.window.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.load().is_empty()
    }
}
