//! # Ingestion → Query Flows
//!
//! Updates go in through the `StatusIngest` port and come back out through
//! JSON-RPC over HTTP.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use node_runtime::{NodeConfig, NodeRuntime};
    use serde_json::{json, Value};
    use shared_types::{BlockHeader, Buf32};
    use status_store::{IngestError, StatusIngest};
    use std::time::Duration;

    fn headers(value: Value) -> Vec<BlockHeader> {
        serde_json::from_value(value).unwrap()
    }

    // =========================================================================
    // HEADER INDEX
    // =========================================================================

    #[tokio::test]
    async fn test_recent_headers_newest_first() {
        let node = TestNode::with_chain(10).await;

        let recent = headers(node.result("strata_getRecentBlockHeaders", json!([4])).await);
        let idxs: Vec<u64> = recent.iter().map(|h| h.block_idx).collect();
        assert_eq!(idxs, vec![9, 8, 7, 6]);
        for pair in recent.windows(2) {
            assert!(pair[0].extends(&pair[1]));
        }

        let none = node.result("strata_getRecentBlockHeaders", json!([0])).await;
        assert_eq!(none, json!([]));

        let all = headers(node.result("strata_getRecentBlockHeaders", json!([1000])).await);
        assert_eq!(all.len(), 10);
        node.stop().await;
    }

    #[tokio::test]
    async fn test_lookups_agree() {
        let node = TestNode::with_chain(5).await;

        let at = headers(node.result("strata_getHeadersAtIdx", json!([3])).await);
        assert_eq!(at, vec![header(3)]);

        let by_id: BlockHeader = serde_json::from_value(
            node.result("strata_getHeaderById", json!([block_id(3).to_hex()]))
                .await,
        )
        .unwrap();
        assert_eq!(by_id, header(3));

        let prefixed = format!("0x{}", block_id(3).to_hex().to_uppercase());
        let again = node.result("strata_getHeaderById", json!([prefixed])).await;
        assert_eq!(again["block_id"], block_id(3).to_hex());
        node.stop().await;
    }

    #[tokio::test]
    async fn test_retention_evicts_oldest() {
        let mut config = local_config();
        config.retention.max_headers = 4;
        let node = TestNode::start_with(config).await;
        for h in chain(10) {
            node.state.append_header(h).unwrap();
        }

        let all = headers(node.result("strata_getRecentBlockHeaders", json!([100])).await);
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].block_idx, 6);
        assert_eq!(
            node.error_code("strata_getHeadersAtIdx", json!([2])).await,
            -32001
        );
        node.stop().await;
    }

    #[tokio::test]
    async fn test_discontinuity_keeps_serving_last_window() {
        let node = TestNode::with_chain(6).await;

        let mut orphan = header(6);
        orphan.prev_block = Buf32([0xee; 32]);
        assert!(matches!(
            node.state.append_header(orphan),
            Err(IngestError::ChainDiscontinuity { .. })
        ));
        assert_eq!(
            node.state.append_header(header(6)),
            Err(IngestError::IngestionHalted)
        );

        let recent = headers(node.result("strata_getRecentBlockHeaders", json!([1])).await);
        assert_eq!(recent, vec![header(5)]);
        node.stop().await;
    }

    // =========================================================================
    // CLIENT STATUS
    // =========================================================================

    #[tokio::test]
    async fn test_status_updates_visible() {
        let node = TestNode::with_chain(8).await;
        node.state.update_status(chain_status(7, 4, 120)).unwrap();

        let client = node.result("strata_clientStatus", json!([])).await;
        assert_eq!(client["chain_tip"], block_id(7).to_hex());
        assert_eq!(client["chain_tip_slot"], 7);
        assert_eq!(client["finalized_blkid"], block_id(4).to_hex());
        assert_eq!(client["buried_l1_height"], 120);

        let sync = node.result("strata_syncStatus", json!([])).await;
        assert_eq!(sync["tip_height"], 7);
        assert_eq!(sync["tip_block_id"], format!("0x{}", block_id(7).to_hex()));
        assert_eq!(sync["finalized_block_id"], format!("0x{}", block_id(4).to_hex()));
        assert_eq!(sync["tip_block_id"].as_str().unwrap().len(), 66);
        node.stop().await;
    }

    #[tokio::test]
    async fn test_regressions_rejected() {
        let node = TestNode::with_chain(8).await;
        node.state.update_status(chain_status(7, 4, 120)).unwrap();

        assert!(matches!(
            node.state.update_status(chain_status(6, 4, 120)),
            Err(IngestError::SlotRegression { .. })
        ));
        assert!(matches!(
            node.state.update_status(chain_status(7, 4, 100)),
            Err(IngestError::BuriedHeightRegression { .. })
        ));

        let client = node.result("strata_clientStatus", json!([])).await;
        assert_eq!(client["chain_tip_slot"], 7);
        assert_eq!(client["buried_l1_height"], 120);
        node.stop().await;
    }

    // =========================================================================
    // L1
    // =========================================================================

    #[tokio::test]
    async fn test_l1_blocks_and_reorg() {
        let node = TestNode::start().await;
        for height in 100..105 {
            node.state
                .record_l1_block(height, Buf32([height as u8; 32]))
                .unwrap();
        }
        node.state.update_l1_status(l1_status(104)).unwrap();

        assert_eq!(
            node.result("strata_getL1blockHash", json!([102])).await,
            Buf32([102; 32]).to_hex()
        );
        assert_eq!(node.result("strata_l1connected", json!([])).await, true);
        let l1 = node.result("strata_l1status", json!([])).await;
        assert_eq!(l1["cur_height"], 104);
        assert!(l1["last_published_txid"].is_null());

        // Reorg at 102 drops 103 and 104.
        node.state.record_l1_block(102, Buf32([0xaa; 32])).unwrap();
        assert_eq!(
            node.result("strata_getL1blockHash", json!([102])).await,
            Buf32([0xaa; 32]).to_hex()
        );
        assert_eq!(
            node.error_code("strata_getL1blockHash", json!([104])).await,
            -32001
        );
        node.stop().await;
    }

    #[tokio::test]
    async fn test_l1_status_reports_configured_network() {
        let mut config = local_config();
        config.chain.network = "regtest".to_string();
        let node = TestNode::start_with(config).await;

        let l1 = node.result("strata_l1status", json!([])).await;
        assert_eq!(l1["network"], "regtest");
        assert_eq!(l1["bitcoin_rpc_connected"], false);
        node.stop().await;
    }

    // =========================================================================
    // NODE RUNTIME
    // =========================================================================

    #[tokio::test]
    async fn test_runtime_with_dev_follower() {
        let mut config = NodeConfig::default();
        config.gateway = local_config();
        config.gateway.chain.block_time_ms = 10;
        config.dev_follower.enabled = true;
        config.dev_follower.l1_interval = 2;

        let mut runtime = NodeRuntime::new(config).unwrap();
        let addr = runtime.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let client = reqwest::Client::new();
        let call = |method: &'static str, params: Value| {
            let client = client.clone();
            async move {
                let body = json!({"jsonrpc":"2.0","method":method,"params":params,"id":1});
                let response: Value = client
                    .post(format!("http://{addr}/"))
                    .json(&body)
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                response["result"].clone()
            }
        };

        assert_eq!(call("strata_blockTime", json!([])).await, 10);
        let recent = headers(call("strata_getRecentBlockHeaders", json!([5])).await);
        assert!(!recent.is_empty());
        for pair in recent.windows(2) {
            assert!(pair[0].extends(&pair[1]));
        }

        let status = call("strata_clientStatus", json!([])).await;
        assert_ne!(status["finalized_blkid"], "0".repeat(64));
        let finalized_id = status["finalized_blkid"].clone();
        let finalized = call("strata_getHeaderById", json!([finalized_id])).await;
        let tip_slot = status["chain_tip_slot"].as_u64().unwrap();
        assert!(finalized["block_idx"].as_u64().unwrap() <= tip_slot);

        assert_eq!(call("strata_l1connected", json!([])).await, true);
        let l1 = call("strata_l1status", json!([])).await;
        let l1_height = l1["cur_height"].as_u64().unwrap();
        let tip_hash = call("strata_getL1blockHash", json!([l1_height])).await;
        assert_eq!(tip_hash, l1["cur_tip_blkid"]);

        runtime.shutdown().await.unwrap();
    }
}
