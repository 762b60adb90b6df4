//! Error types for the status store.
//!
//! `IngestError` belongs to the ingestion path and is never shown to RPC
//! clients. `QueryError` is what a read port reports when it cannot serve.

use shared_types::Buf32;
use thiserror::Error;

/// Errors raised while applying follower updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Header does not extend the newest indexed header.
    #[error(
        "chain discontinuity: expected block {expected_idx} on top of {expected_prev}, \
         got block {got_idx} on top of {got_prev}"
    )]
    ChainDiscontinuity {
        expected_prev: Buf32,
        expected_idx: u64,
        got_prev: Buf32,
        got_idx: u64,
    },

    /// Header ingestion was halted by an earlier discontinuity.
    #[error("header ingestion halted after a chain discontinuity")]
    IngestionHalted,

    /// Chain tip slot went backwards.
    #[error("chain tip slot regressed from {current} to {proposed}")]
    SlotRegression { current: u64, proposed: u64 },

    /// Buried L1 height went backwards.
    #[error("buried L1 height regressed from {current} to {proposed}")]
    BuriedHeightRegression { current: u64, proposed: u64 },

    /// Finalized block is known not to be an ancestor of the tip.
    #[error("finalized block {finalized} is not an ancestor of tip {tip}")]
    FinalizedNotAncestor { finalized: Buf32, tip: Buf32 },
}

impl IngestError {
    /// Whether this error stops header ingestion for good.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IngestError::ChainDiscontinuity { .. } | IngestError::IngestionHalted
        )
    }
}

/// Errors a read port may report.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Backing store cannot be read right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
