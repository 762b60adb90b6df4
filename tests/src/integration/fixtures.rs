//! Shared fixtures: a node bound to an ephemeral port and synthetic chains.

use rpc_gateway::{GatewayConfig, RpcService};
use serde_json::{json, Value};
use shared_types::{BlockHeader, Buf32, ChainStatus, L1Status};
use status_store::{NodeState, StatusIngest};
use std::net::SocketAddr;
use std::sync::Arc;

/// Deterministic id for block `n`; distinct for every `n`.
pub fn block_id(n: u64) -> Buf32 {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xb1;
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    Buf32(bytes)
}

/// Header at `idx` linked to `block_id(idx - 1)`.
pub fn header(idx: u64) -> BlockHeader {
    BlockHeader {
        block_idx: idx,
        timestamp: 1_700_000_000_000 + idx * 5_000,
        block_id: block_id(idx),
        prev_block: if idx == 0 { Buf32::ZERO } else { block_id(idx - 1) },
        l1_segment_hash: Buf32([0x11; 32]),
        exec_segment_hash: Buf32([0x22; 32]),
        state_root: Buf32([idx as u8; 32]),
    }
}

/// Headers `0..n` as one linked chain.
pub fn chain(n: u64) -> Vec<BlockHeader> {
    (0..n).map(header).collect()
}

/// Client status with tip `tip` and finalized block `finalized`.
pub fn chain_status(tip: u64, finalized: u64, buried_l1_height: u64) -> ChainStatus {
    ChainStatus {
        chain_tip: block_id(tip),
        chain_tip_slot: tip,
        finalized_blkid: block_id(finalized),
        last_l1_block: Buf32([0x33; 32]),
        buried_l1_height,
    }
}

/// Connected L1 reader status at `height`.
pub fn l1_status(height: u64) -> L1Status {
    L1Status {
        bitcoin_rpc_connected: true,
        cur_height: height,
        cur_tip_blkid: Buf32([0x44; 32]),
        last_published_txid: None,
        published_inscription_count: 0,
        last_update: 1_700_000_000_000,
        network: "signet".to_string(),
    }
}

/// Gateway config bound to 127.0.0.1 on a free port.
pub fn local_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.http.host = "127.0.0.1".parse().expect("valid ip");
    config.http.port = 0;
    config
}

/// A running RPC service with direct access to its node state.
pub struct TestNode {
    pub state: Arc<NodeState>,
    pub service: RpcService,
    pub addr: SocketAddr,
    client: reqwest::Client,
}

impl TestNode {
    pub async fn start() -> Self {
        Self::start_with(local_config()).await
    }

    pub async fn start_with(config: GatewayConfig) -> Self {
        let state = Arc::new(NodeState::with_network(
            &config.retention,
            config.chain.network.clone(),
        ));
        let mut service = RpcService::new(config, state.clone()).expect("service builds");
        let addr = service.start().await.expect("service starts");
        Self {
            state,
            service,
            addr,
            client: reqwest::Client::new(),
        }
    }

    /// Node with `n` linked headers ingested and the tip reported.
    pub async fn with_chain(n: u64) -> Self {
        let node = Self::start().await;
        for h in chain(n) {
            node.state.append_header(h).expect("linked header");
        }
        if n > 0 {
            node.state
                .update_status(chain_status(n - 1, n.saturating_sub(3), 0))
                .expect("status accepted");
        }
        node
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a raw body and return status plus body text.
    pub async fn post_raw(&self, body: impl Into<String>) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .post(self.url("/"))
            .header("content-type", "application/json")
            .body(body.into())
            .send()
            .await
            .expect("request sent");
        let status = response.status();
        let text = response.text().await.expect("body read");
        (status, text)
    }

    /// Call `method` with `params` and id 1; returns the whole response object.
    pub async fn call(&self, method: &str, params: Value) -> Value {
        let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": 1 });
        let (status, text) = self.post_raw(body.to_string()).await;
        assert_eq!(status, reqwest::StatusCode::OK);
        serde_json::from_str(&text).expect("json response")
    }

    /// `result` of a call that must succeed.
    pub async fn result(&self, method: &str, params: Value) -> Value {
        let response = self.call(method, params).await;
        assert!(
            response.get("error").is_none(),
            "{method} failed: {response}"
        );
        response["result"].clone()
    }

    /// `error.code` of a call that must fail.
    pub async fn error_code(&self, method: &str, params: Value) -> i64 {
        let response = self.call(method, params).await;
        assert!(response.get("result").is_none(), "{method} succeeded: {response}");
        response["error"]["code"].as_i64().expect("numeric code")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request sent")
            .json()
            .await
            .expect("json body")
    }

    pub async fn stop(mut self) {
        self.service.shutdown().await.expect("clean shutdown");
    }
}
