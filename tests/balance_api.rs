//! End-to-end tests for the token-balance endpoint against a mock JSON-RPC node.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod common;
use common::{get, start_gateway, start_mock_upstream, test_config, MockRequest, MockResponse};

const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const TOKEN: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

const BALANCE_OF: &str = "0x70a08231";
const DECIMALS: &str = "0x313ce567";

fn word(value: u128) -> String {
    format!("0x{:064x}", value)
}

/// Answers `balanceOf` with 1234.5 tokens at 6 decimals.
fn rpc_reply(req: &MockRequest) -> MockResponse {
    let call: Value = match serde_json::from_slice(&req.body) {
        Ok(call) => call,
        Err(_) => return MockResponse::text(400, "bad json"),
    };
    let id = call["id"].clone();
    let result = match call["method"].as_str() {
        Some("eth_chainId") => json!("0x1"),
        Some("eth_call") => {
            let tx = &call["params"][0];
            let input = tx["input"].as_str().or(tx["data"].as_str()).unwrap_or_default();
            if input.starts_with(BALANCE_OF) {
                json!(word(1_234_500_000))
            } else if input.starts_with(DECIMALS) {
                json!(word(6))
            } else {
                json!("0x")
            }
        }
        _ => {
            return MockResponse::json(
                200,
                json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32601, "message": "method not found" } }),
            )
        }
    };
    MockResponse::json(200, json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

#[tokio::test]
async fn test_balance_in_whole_units() {
    let upstream = start_mock_upstream(|req| async move { rpc_reply(&req) }).await;
    let (router, subsystems) = start_gateway(&test_config(upstream)).await;

    let (status, body) = get(
        &router,
        &format!("/token-balance?walletAddress={}&tokenContractAddress={}", WALLET, TOKEN),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "balance": "1234" }));

    subsystems.blockchain.verify_chain_id().await.unwrap();
}

#[tokio::test]
async fn test_invalid_addresses_skip_rpc() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let upstream = start_mock_upstream(move |req| {
        c.fetch_add(1, Ordering::SeqCst);
        async move { rpc_reply(&req) }
    })
    .await;
    let (router, _subsystems) = start_gateway(&test_config(upstream)).await;

    let cases = [
        (format!("?tokenContractAddress={}", TOKEN), "Invalid wallet address"),
        (format!("?walletAddress=0x123&tokenContractAddress={}", TOKEN), "Invalid wallet address"),
        (format!("?walletAddress={}", WALLET), "Invalid token contract address"),
        ("?walletAddress=nope&tokenContractAddress=nope".to_string(), "Invalid wallet address"),
    ];
    for (query, message) in cases {
        let (status, body) = get(&router, &format!("/token-balance{}", query)).await;
        assert_eq!(status, 400, "query {}", query);
        assert_eq!(body, json!({ "error": message }));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_node_failure_is_500() {
    let upstream = start_mock_upstream(|_| async { MockResponse::text(503, "down") }).await;
    let (router, _subsystems) = start_gateway(&test_config(upstream)).await;

    let (status, body) = get(
        &router,
        &format!("/token-balance?walletAddress={}&tokenContractAddress={}", WALLET, TOKEN),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to fetch token balance" }));
}
