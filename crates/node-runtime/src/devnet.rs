//! # Dev Follower
//!
//! Synthetic chain source for running the node without a sequencer. Each
//! tick produces one L2 block on top of the previous one and feeds it through
//! the regular ingestion API, so every store invariant is exercised exactly
//! as with a real follower.
//!
//! Ids are SHA-256 digests, which keeps the chain deterministic for a given
//! sequence of timestamps.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{BlockHeader, Buf32, ChainStatus, L1Status};
use status_store::{IngestError, StatusIngest};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::config::ConfigError;

/// Dev follower settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevFollowerConfig {
    /// Run the follower at all.
    pub enabled: bool,
    /// Blocks between the tip and the finalized block.
    pub finality_depth: u64,
    /// L2 blocks per synthetic L1 block.
    pub l1_interval: u64,
    /// L1 confirmations before a height counts as buried.
    pub l1_bury_depth: u64,
    /// Height of the first synthetic L1 block.
    pub l1_start_height: u64,
}

impl DevFollowerConfig {
    /// Check the settings against the header retention of the node.
    ///
    /// The finalized block must stay inside the header index, so
    /// `finality_depth` has to be below `max_headers`.
    pub fn validate(&self, max_headers: usize) -> Result<(), ConfigError> {
        if self.l1_interval == 0 {
            return Err(ConfigError::InvalidDevFollower(
                "l1_interval cannot be 0".into(),
            ));
        }
        let within_retention = usize::try_from(self.finality_depth)
            .map(|depth| depth < max_headers)
            .unwrap_or(false);
        if !within_retention {
            return Err(ConfigError::InvalidDevFollower(format!(
                "finality_depth {} must be below max_headers {max_headers}",
                self.finality_depth
            )));
        }
        Ok(())
    }
}

impl Default for DevFollowerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            finality_depth: 4,
            l1_interval: 6,
            l1_bury_depth: 6,
            l1_start_height: 100,
        }
    }
}

/// Produces a linked synthetic chain and pushes it into the node state.
pub struct DevFollower {
    ingest: Arc<dyn StatusIngest>,
    config: DevFollowerConfig,
    network: String,
    tip: Option<BlockHeader>,
    /// Newest `finality_depth + 1` block ids; the front is the finalized one.
    window: VecDeque<Buf32>,
    l1_height: Option<u64>,
    l1_tip: Buf32,
}

impl DevFollower {
    pub fn new(ingest: Arc<dyn StatusIngest>, config: DevFollowerConfig, network: String) -> Self {
        Self {
            ingest,
            config,
            network,
            tip: None,
            window: VecDeque::new(),
            l1_height: None,
            l1_tip: Buf32::ZERO,
        }
    }

    /// Last header produced, if any.
    pub fn tip(&self) -> Option<&BlockHeader> {
        self.tip.as_ref()
    }

    /// Produce and ingest one block stamped `now_ms`.
    pub fn step(&mut self, now_ms: u64) -> Result<BlockHeader, IngestError> {
        let (block_idx, prev_block) = match &self.tip {
            Some(tip) => (tip.block_idx + 1, tip.block_id),
            None => (0, Buf32::ZERO),
        };
        let block_id = digest(&[
            prev_block.as_bytes(),
            &block_idx.to_be_bytes(),
            &now_ms.to_be_bytes(),
        ]);
        let header = BlockHeader {
            block_idx,
            timestamp: now_ms,
            block_id,
            prev_block,
            l1_segment_hash: digest(&[b"l1-segment", block_id.as_bytes()]),
            exec_segment_hash: digest(&[b"exec-segment", block_id.as_bytes()]),
            state_root: digest(&[b"state-root", block_id.as_bytes()]),
        };
        self.ingest.append_header(header.clone())?;

        if block_idx.checked_rem(self.config.l1_interval) == Some(0) {
            self.advance_l1(now_ms)?;
        }

        self.window.push_back(block_id);
        while self.window.len() as u64 > self.config.finality_depth.saturating_add(1) {
            self.window.pop_front();
        }
        let finalized_blkid = self.window.front().copied().unwrap_or(block_id);

        let buried_l1_height = self
            .l1_height
            .map(|h| h.saturating_sub(self.config.l1_bury_depth))
            .unwrap_or(0);
        self.ingest.update_status(ChainStatus {
            chain_tip: block_id,
            chain_tip_slot: block_idx,
            finalized_blkid,
            last_l1_block: self.l1_tip,
            buried_l1_height,
        })?;

        debug!(block_idx, block_id = %block_id, "Dev block produced");
        self.tip = Some(header.clone());
        Ok(header)
    }

    fn advance_l1(&mut self, now_ms: u64) -> Result<(), IngestError> {
        let height = match self.l1_height {
            Some(h) => h + 1,
            None => self.config.l1_start_height,
        };
        let hash = digest(&[b"l1-block", self.l1_tip.as_bytes(), &height.to_be_bytes()]);
        self.ingest.record_l1_block(height, hash)?;
        self.ingest.update_l1_status(L1Status {
            bitcoin_rpc_connected: true,
            cur_height: height,
            cur_tip_blkid: hash,
            last_published_txid: None,
            published_inscription_count: 0,
            last_update: now_ms,
            network: self.network.clone(),
        })?;
        self.l1_height = Some(height);
        self.l1_tip = hash;
        Ok(())
    }

    /// Produce a block every `block_time` until `shutdown` flips to `true`.
    ///
    /// Stops on the first ingestion error.
    pub async fn run(mut self, block_time: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(block_time);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            block_time_ms = block_time.as_millis() as u64,
            finality_depth = self.config.finality_depth,
            "Dev follower started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.step(unix_millis()) {
                        error!(error = %err, "Dev follower stopped on ingestion error");
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            tip = self.tip.as_ref().map(|h| h.block_idx),
            "Dev follower stopped"
        );
    }
}

fn digest(parts: &[&[u8]]) -> Buf32 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Buf32(hasher.finalize().into())
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
