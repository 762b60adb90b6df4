//! HTTP integration tests.

pub mod fixtures;

mod flows;
mod rpc_http;
