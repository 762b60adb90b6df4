//! # Core Domain Entities
//!
//! The chain facts the status service keeps and serves.
//!
//! ## Clusters
//!
//! - **Identifiers**: `Buf32`
//! - **L2 Chain**: `BlockHeader`, `ChainStatus`, `SyncStatus`
//! - **L1 Anchor**: `L1Status`

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::Buf32ParseError;

// =============================================================================
// CLUSTER A: IDENTIFIERS
// =============================================================================

/// A 32-byte identifier (block id, state root, segment hash, L1 block hash).
///
/// Serializes as 64 lowercase hex characters with no prefix. Deserializes
/// from hex in either case, with or without a leading `0x`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Buf32(pub [u8; 32]);

impl Buf32 {
    /// The all-zero id, used before genesis is observed.
    pub const ZERO: Buf32 = Buf32([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Buf32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Buf32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Buf32 {
    type Err = Buf32ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| Buf32ParseError::InvalidHex(e.to_string()))?;
        let got = bytes.len();
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Buf32ParseError::InvalidLength { got })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Buf32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Buf32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buf32({})", self.to_hex())
    }
}

impl Serialize for Buf32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Buf32 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// CLUSTER B: THE L2 CHAIN
// =============================================================================

/// Header of an L2 block as served by `strata_getRecentBlockHeaders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height of the block in the L2 chain.
    pub block_idx: u64,
    /// Block production time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Id of this block.
    pub block_id: Buf32,
    /// Id of the parent block.
    pub prev_block: Buf32,
    /// Commitment to the L1 segment of the block body.
    pub l1_segment_hash: Buf32,
    /// Commitment to the execution segment of the block body.
    pub exec_segment_hash: Buf32,
    /// Chain state root after applying this block.
    pub state_root: Buf32,
}

impl BlockHeader {
    /// Whether `self` directly extends `parent`.
    pub fn extends(&self, parent: &BlockHeader) -> bool {
        self.prev_block == parent.block_id
            && parent.block_idx.checked_add(1) == Some(self.block_idx)
    }
}

/// Snapshot of the client's view of the chain, returned by
/// `strata_clientStatus`.
///
/// Invariants upheld by the ingestion path:
/// - `finalized_blkid` is `chain_tip` or one of its ancestors.
/// - `chain_tip_slot` and `buried_l1_height` never decrease.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainStatus {
    /// Id of the most recent block known to the local layer.
    pub chain_tip: Buf32,
    /// Slot of the chain tip.
    pub chain_tip_slot: u64,
    /// Id of the most recent finalized block.
    pub finalized_blkid: Buf32,
    /// Hash of the most recently observed L1 block.
    pub last_l1_block: Buf32,
    /// Deepest L1 height treated as irreversible.
    pub buried_l1_height: u64,
}

impl ChainStatus {
    /// True until the follower has reported a finalized genesis.
    pub fn is_pre_genesis(&self) -> bool {
        self.finalized_blkid.is_zero()
    }
}

/// Condensed sync view returned by `strata_syncStatus`.
///
/// Unlike the other entities, both ids carry a `0x` prefix on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub tip_height: u64,
    #[serde(with = "prefixed_hex")]
    pub tip_block_id: Buf32,
    #[serde(with = "prefixed_hex")]
    pub finalized_block_id: Buf32,
}

/// `0x`-prefixed hex encoding for a [`Buf32`] field.
pub mod prefixed_hex {
    use super::Buf32;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(id: &Buf32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", id.to_hex()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Buf32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl From<&ChainStatus> for SyncStatus {
    fn from(status: &ChainStatus) -> Self {
        Self {
            tip_height: status.chain_tip_slot,
            tip_block_id: status.chain_tip,
            finalized_block_id: status.finalized_blkid,
        }
    }
}

// =============================================================================
// CLUSTER C: THE L1 ANCHOR
// =============================================================================

/// State of the L1 (Bitcoin) reader, returned by `strata_l1status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Status {
    /// Whether the reader can currently reach its bitcoin node.
    pub bitcoin_rpc_connected: bool,
    /// Height of the current L1 tip.
    pub cur_height: u64,
    /// Hash of the current L1 tip.
    pub cur_tip_blkid: Buf32,
    /// Last transaction this node published to L1, if any.
    pub last_published_txid: Option<Buf32>,
    /// Number of inscriptions published so far.
    pub published_inscription_count: u64,
    /// Time of the last reader update, milliseconds since the Unix epoch.
    pub last_update: u64,
    /// L1 network name (e.g. `signet`).
    pub network: String,
}

impl Default for L1Status {
    fn default() -> Self {
        Self {
            bitcoin_rpc_connected: false,
            cur_height: 0,
            cur_tip_blkid: Buf32::ZERO,
            last_published_txid: None,
            published_inscription_count: 0,
            last_update: 0,
            network: "signet".to_string(),
        }
    }
}
