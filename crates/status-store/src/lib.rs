//! # Status Store
//!
//! In-memory state backing the node status RPC.
//!
//! ## Architecture
//!
//! ```text
//!  chain follower / L1 reader
//!            │  (StatusIngest)
//!            ▼
//!   ┌─────────────────────────────────────────────┐
//!   │                 NodeState                   │
//!   │  ┌─────────────┐ ┌────────────┐ ┌─────────┐ │
//!   │  │ StatusStore │ │HeaderIndex │ │L1 Index │ │
//!   │  │  (ArcSwap)  │ │ (CoW ring) │ │(CoW map)│ │
//!   │  └─────────────┘ └────────────┘ └─────────┘ │
//!   └─────────────────────────────────────────────┘
//!            │  (StatusQuery)
//!            ▼
//!       RPC handlers
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforced by |
//! |-----------|-------------|
//! | Snapshot reads are never torn | `StatusStore` publishes whole `StatusSnapshot`s |
//! | `chain_tip_slot` never decreases | `StatusStore::update_client` |
//! | `buried_l1_height` never decreases | `StatusStore::update_client` |
//! | `finalized_blkid` is an ancestor of `chain_tip` | `NodeState::update_status` |
//! | Indexed headers form one linked chain | `HeaderIndex::append` |
//! | Index size is bounded | retention limits on both indices |
//!
//! Writers are serialised per store with a mutex; readers load an immutable
//! `Arc` and never take a lock.

pub mod error;
pub mod header_index;
pub mod l1_index;
pub mod node_state;
pub mod ports;
pub mod snapshot;

pub use error::{IngestError, QueryError};
pub use header_index::HeaderIndex;
pub use l1_index::{L1BlockIndex, L1Record};
pub use node_state::{NodeState, StoreConfig};
pub use ports::{StatusIngest, StatusQuery};
pub use snapshot::{StatusSnapshot, StatusStore};
