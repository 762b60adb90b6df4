//! # Shared Types Crate
//!
//! Chain entities exposed by the status RPC and produced by the ingestion
//! path (chain follower, L1 reader).
//!
//! ## Clusters
//!
//! - **Identifiers**: [`Buf32`], the fixed-length hash used for block ids,
//!   state roots and L1 block hashes.
//! - **L2 chain**: [`BlockHeader`], [`ChainStatus`], [`SyncStatus`]
//! - **L1 anchor**: [`L1Status`]
//!
//! 32-byte identifiers travel over the wire as 64 lowercase hex characters
//! without a `0x` prefix, except in [`SyncStatus`], which prefixes them.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
