//! Block-explorer client (Etherscan-compatible `account/txlist`).
//!
//! # Responsibilities
//! - Issue one GET per request for the latest page of an address
//! - Decode the `{status, message, result}` envelope
//! - Classify failures as unavailable (transport/body) or rejected (status "0")

use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::config::ExplorerConfig;
use crate::observability::metrics;
use crate::transactions::types::TransactionError;

/// Upper block bound covering all history.
pub const END_BLOCK_SENTINEL: u64 = 99_999_999;

/// A transaction entry exactly as the provider returns it (all strings).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    #[serde(default)]
    pub block_number: String,
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub gas_used: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    /// "0" for transactions that executed successfully.
    #[serde(default)]
    pub is_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// Errors from the transaction-listing provider.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<ExplorerError> for TransactionError {
    fn from(err: ExplorerError) -> Self {
        match err {
            ExplorerError::Rejected(message) => TransactionError::UpstreamRejected(message),
            other => TransactionError::UpstreamUnavailable(other.to_string()),
        }
    }
}

/// Source of the most recent transactions of an address.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Up to `limit` transactions, most recent first.
    async fn latest_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<RawTransaction>, ExplorerError>;
}

/// Etherscan-compatible HTTP client, built once and shared.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(config: &ExplorerConfig, timeout: Duration) -> Result<Self, ExplorerError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ExplorerError::Malformed(format!("base URL '{}': {}", config.base_url, e)))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn request_url(&self, address: &str, limit: u32) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("module", "account")
                .append_pair("action", "txlist")
                .append_pair("address", address)
                .append_pair("startBlock", "0")
                .append_pair("endBlock", &END_BLOCK_SENTINEL.to_string())
                .append_pair("page", "1")
                .append_pair("offset", &limit.to_string())
                .append_pair("sort", "desc");
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
        }
        url
    }
}

#[async_trait]
impl TransactionProvider for EtherscanClient {
    async fn latest_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<RawTransaction>, ExplorerError> {
        let start = Instant::now();
        let result: Result<Vec<RawTransaction>, ExplorerError> = async {
            let response = self.client.get(self.request_url(address, limit)).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ExplorerError::Status(status));
            }
            let body = response.bytes().await?;
            parse_envelope(&body)
        }
        .await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(ExplorerError::Rejected(_)) => "rejected",
            Err(_) => "unavailable",
        };
        metrics::record_upstream_call("explorer", outcome, start);

        if let Err(e) = &result {
            tracing::warn!(address = %address, limit, error = %e, "Explorer call failed");
        }
        result
    }
}

/// Decode a txlist envelope.
pub fn parse_envelope(body: &[u8]) -> Result<Vec<RawTransaction>, ExplorerError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| ExplorerError::Malformed(e.to_string()))?;

    if envelope.status != "1" {
        let message = match envelope.result {
            serde_json::Value::String(s) if !s.is_empty() => s,
            _ => envelope.message,
        };
        return Err(ExplorerError::Rejected(message));
    }

    serde_json::from_value(envelope.result).map_err(|e| ExplorerError::Malformed(e.to_string()))
}
