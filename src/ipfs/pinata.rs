//! Pinata pinning API and gateway client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::config::PinningConfig;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum PinningError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("pinning service returned HTTP {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("invalid pinning configuration: {0}")]
    Config(String),
}

/// Content fetched back from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Json(serde_json::Value),
    Text(String),
}

/// Content-addressed storage behind a pinning service.
#[async_trait]
pub trait PinningProvider: Send + Sync {
    /// Pin `content` as a text file and return its CID.
    async fn pin_text(&self, name: &str, content: String) -> Result<String, PinningError>;

    /// Fetch pinned content, `None` when the gateway does not have it.
    async fn fetch(&self, cid: &str) -> Result<Option<FileContent>, PinningError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
}

/// Pinata client, built once and shared.
#[derive(Debug, Clone)]
pub struct PinataClient {
    client: reqwest::Client,
    api_url: Url,
    gateway_url: Url,
    jwt: Option<String>,
}

impl PinataClient {
    pub fn new(config: &PinningConfig, timeout: Duration) -> Result<Self, PinningError> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| PinningError::Config(format!("api_url '{}': {}", config.api_url, e)))?;
        let gateway_url = gateway_base(&config.gateway)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        if config.jwt.is_none() {
            tracing::warn!("Pinning JWT not configured; uploads will be rejected");
        }

        Ok(Self {
            client,
            api_url,
            gateway_url,
            jwt: config.jwt.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PinningError> {
        self.api_url
            .join(path)
            .map_err(|e| PinningError::Config(e.to_string()))
    }
}

/// Accept either a bare host ("x.mypinata.cloud") or a full URL.
fn gateway_base(gateway: &str) -> Result<Url, PinningError> {
    let raw = if gateway.contains("://") {
        gateway.to_string()
    } else {
        format!("https://{}", gateway)
    };
    let mut url = Url::parse(&raw).map_err(|e| PinningError::Config(format!("gateway '{}': {}", gateway, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl PinningProvider for PinataClient {
    async fn pin_text(&self, name: &str, content: String) -> Result<String, PinningError> {
        let start = Instant::now();
        let part = Part::text(content).file_name(name.to_string()).mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        let mut request = self.client.post(self.endpoint("pinning/pinFileToIPFS")?).multipart(form);
        if let Some(jwt) = &self.jwt {
            request = request.bearer_auth(jwt);
        }

        let result: Result<String, PinningError> = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(PinningError::Status { status, body });
            }
            let pinned: PinResponse = response.json().await?;
            Ok(pinned.ipfs_hash)
        }
        .await;

        metrics::record_upstream_call("pinning", if result.is_ok() { "ok" } else { "unavailable" }, start);
        result
    }

    async fn fetch(&self, cid: &str) -> Result<Option<FileContent>, PinningError> {
        let start = Instant::now();
        let url = self
            .gateway_url
            .join(&format!("ipfs/{}", cid))
            .map_err(|e| PinningError::Config(e.to_string()))?;

        let result: Result<Option<FileContent>, PinningError> = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(PinningError::Status { status, body });
            }
            let is_json = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json"));
            let text = response.text().await?;
            Ok(Some(decode_content(text, is_json)))
        }
        .await;

        metrics::record_upstream_call("gateway", if result.is_ok() { "ok" } else { "unavailable" }, start);
        result
    }
}

fn decode_content(text: String, is_json: bool) -> FileContent {
    if is_json {
        if let Ok(value) = serde_json::from_str(&text) {
            return FileContent::Json(value);
        }
    }
    FileContent::Text(text)
}
