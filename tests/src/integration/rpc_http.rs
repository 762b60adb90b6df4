//! Envelope handling and error codes, end to end over HTTP.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use futures::future::join_all;
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    // =========================================================================
    // SUCCESS PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_block_time_exact_body() {
        let node = TestNode::start().await;
        let (status, body) = node
            .post_raw(r#"{"jsonrpc":"2.0","method":"strata_blockTime","params":[],"id":1}"#)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"jsonrpc":"2.0","result":5000,"id":1}"#);
        node.stop().await;
    }

    #[tokio::test]
    async fn test_string_id_echoed() {
        let node = TestNode::start().await;
        let (_, body) = node
            .post_raw(r#"{"jsonrpc":"2.0","method":"strata_protocolVersion","id":"req-7"}"#)
            .await;
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["id"], "req-7");
        assert_eq!(response["result"], 1);
        node.stop().await;
    }

    #[tokio::test]
    async fn test_pre_genesis_status() {
        let node = TestNode::start().await;

        let client = node.result("strata_clientStatus", json!([])).await;
        assert_eq!(client["chain_tip"], "0".repeat(64));
        assert_eq!(client["chain_tip_slot"], 0);
        assert_eq!(client["buried_l1_height"], 0);

        assert_eq!(node.result("strata_l1connected", json!([])).await, false);
        let headers = node
            .result("strata_getRecentBlockHeaders", json!([10]))
            .await;
        assert_eq!(headers, json!([]));
        node.stop().await;
    }

    // =========================================================================
    // ERROR PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let node = TestNode::start().await;
        let (status, body) = node.post_raw(r#"{"jsonrpc":"2.0","method":"#).await;
        assert_eq!(status, StatusCode::OK);

        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert!(response["id"].is_null());
        assert!(response.get("result").is_none());
        node.stop().await;
    }

    #[tokio::test]
    async fn test_invalid_envelopes() {
        let node = TestNode::start().await;
        let cases = [
            r#"[{"jsonrpc":"2.0","method":"strata_blockTime","id":1}]"#,
            r#"{"jsonrpc":"1.0","method":"strata_blockTime","id":1}"#,
            r#"{"jsonrpc":"2.0","method":"strata_blockTime"}"#,
            r#"{"jsonrpc":"2.0","method":"strata_blockTime","id":1.5}"#,
            r#"{"jsonrpc":"2.0","method":7,"id":1}"#,
            r#"{"jsonrpc":"2.0","method":"strata_blockTime","params":{"a":1},"id":1}"#,
        ];
        for body in cases {
            let (status, text) = node.post_raw(body).await;
            assert_eq!(status, StatusCode::OK, "{body}");
            let response: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(response["error"]["code"], -32600, "{body}");
        }
        node.stop().await;
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let node = TestNode::start().await;
        let response = node.call("strata_doesNotExist", json!([])).await;
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], 1);
        node.stop().await;
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let node = TestNode::start().await;
        assert_eq!(
            node.error_code("strata_getRecentBlockHeaders", json!([])).await,
            -32602
        );
        assert_eq!(
            node.error_code("strata_getRecentBlockHeaders", json!(["ten"]))
                .await,
            -32602
        );
        assert_eq!(
            node.error_code("strata_getRecentBlockHeaders", json!([-1])).await,
            -32602
        );
        assert_eq!(
            node.error_code("strata_getHeaderById", json!(["abcd"])).await,
            -32602
        );
        assert_eq!(
            node.error_code("strata_blockTime", json!([1])).await,
            -32602
        );
        node.stop().await;
    }

    #[tokio::test]
    async fn test_unknown_resources() {
        let node = TestNode::with_chain(3).await;
        assert_eq!(
            node.error_code("strata_getL1blockHash", json!([840000])).await,
            -32001
        );
        assert_eq!(
            node.error_code("strata_getHeadersAtIdx", json!([99])).await,
            -32001
        );
        assert_eq!(
            node.error_code("strata_getHeaderById", json!([block_id(99).to_hex()]))
                .await,
            -32001
        );
        node.stop().await;
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_at_transport() {
        let mut config = local_config();
        config.limits.max_request_size = 64;
        let node = TestNode::start_with(config).await;

        let padding = "x".repeat(256);
        let body = format!(
            r#"{{"jsonrpc":"2.0","method":"strata_blockTime","params":[],"id":"{padding}"}}"#
        );
        let (status, _) = node.post_raw(body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        node.stop().await;
    }

    // =========================================================================
    // OPERATIONAL ENDPOINTS
    // =========================================================================

    #[tokio::test]
    async fn test_health_and_metrics() {
        let node = TestNode::start().await;
        assert_eq!(node.get_json("/health").await["status"], "ok");

        node.call("strata_blockTime", json!([])).await;
        node.call("strata_nope", json!([])).await;
        node.post_raw("not json").await;

        let metrics = node.get_json("/metrics").await;
        assert_eq!(metrics["requests"]["total"], 3);
        assert_eq!(metrics["requests"]["success"], 1);
        assert_eq!(metrics["errors"]["method_not_found"], 1);
        assert_eq!(metrics["errors"]["parse_error"], 1);
        node.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_clients() {
        let node = TestNode::with_chain(20).await;
        let calls = (0..32usize).map(|i| {
            let count = i % 25;
            let node = &node;
            async move {
                let headers = node
                    .result("strata_getRecentBlockHeaders", json!([count]))
                    .await;
                (count, headers.as_array().unwrap().len())
            }
        });

        for (count, len) in join_all(calls).await {
            assert_eq!(len, count.min(20));
        }
        node.stop().await;
    }
}
