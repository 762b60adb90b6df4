//! RPC method handlers for the JSON-RPC API.

pub mod strata;

pub use strata::{strata_registry, StrataRpc, STRATA_METHODS};
