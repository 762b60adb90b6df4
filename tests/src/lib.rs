//! # Node Status Test Suite
//!
//! Cross-crate tests that run the real HTTP service on an ephemeral port and
//! talk to it with `reqwest`.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/status_benchmarks.rs   # dispatcher and index throughput
//! └── src/integration/
//!     ├── fixtures.rs                # TestNode, chain builders, rpc client
//!     ├── rpc_http.rs                # envelope and error handling over HTTP
//!     └── flows.rs                   # ingestion → query flows, dev follower
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p status-tests
//! cargo bench -p status-tests
//! ```

pub mod integration;
