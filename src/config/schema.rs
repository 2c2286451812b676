//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.
//! Secrets (API keys, JWTs) are normally left out of the file and overlaid
//! from the environment by the loader.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Path prefixes for each endpoint group.
    pub routes: RoutesConfig,

    /// Persistent store settings.
    pub storage: StorageConfig,

    /// Block-explorer (transaction listing) provider.
    pub explorer: ExplorerConfig,

    /// IPFS pinning service.
    pub pinning: PinningConfig,

    /// Node provider used for token balance lookups.
    pub blockchain: BlockchainConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for a single outbound call to a third-party API in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Path prefixes the endpoint groups are mounted under.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub transactions_prefix: String,
    pub ipfs_prefix: String,
    pub balance_prefix: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            transactions_prefix: "/crypto-transactions".to_string(),
            ipfs_prefix: "/ipfs-storage".to_string(),
            balance_prefix: "/token-balance".to_string(),
        }
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite connection URL (e.g., "sqlite:gateway.db" or "sqlite::memory:").
    pub database_url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:gateway.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Largest page the explorer endpoint will ever request.
pub const MAX_LIMIT_CEILING: u32 = 100;

/// Block-explorer provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL of the Etherscan-compatible API.
    pub base_url: String,

    /// API key. Usually supplied through `ETHERSCAN_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Page size used when the caller does not send `limit`.
    pub default_limit: u32,

    /// Largest accepted `limit`, at most [`MAX_LIMIT_CEILING`].
    pub max_limit: u32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/api".to_string(),
            api_key: None,
            default_limit: 5,
            max_limit: MAX_LIMIT_CEILING,
        }
    }
}

/// IPFS pinning service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PinningConfig {
    /// Pinning API base URL.
    pub api_url: String,

    /// Dedicated gateway host (e.g., "example.mypinata.cloud").
    /// Usually supplied through `PINATA_GATEWAY`.
    pub gateway: String,

    /// JWT used as bearer token. Usually supplied through `PINATA_JWT_TOKEN`.
    #[serde(skip_serializing)]
    pub jwt: Option<String>,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            gateway: "gateway.pinata.cloud".to_string(),
            jwt: None,
        }
    }
}

/// Node provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL. The API key, if any, is appended as the last
    /// path segment.
    pub rpc_url: String,

    /// Project key for the node provider. Usually supplied through `INFURA_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Failover JSON-RPC endpoint URLs (used verbatim).
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Expected chain ID (1 for Ethereum mainnet).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://mainnet.infura.io/v3".to_string(),
            api_key: None,
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
        }
    }
}

impl BlockchainConfig {
    /// The primary endpoint with the project key applied.
    pub fn endpoint(&self) -> String {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                format!("{}/{}", self.rpc_url.trim_end_matches('/'), key)
            }
            _ => self.rpc_url.clone(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
