//! Node-provider RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (primary + failovers)
//! - Read ERC20 balance and decimals via `eth_call`
//! - Handle timeouts and network errors gracefully

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TokenBalance,
};
use crate::observability::metrics;

sol! {
    /// Minimal ERC20 read interface.
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

/// Reads token balances for a wallet.
#[async_trait]
pub trait TokenBalanceReader: Send + Sync {
    async fn token_balance(&self, wallet: Address, token: Address) -> BlockchainResult<TokenBalance>;
}

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client. No network traffic happens here.
    pub fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.endpoint().parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(ProviderBuilder::new().connect_http(primary_url).erased());

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse::<url::Url>() {
                providers.push(ProviderBuilder::new().connect_http(url).erased());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            providers = providers.len(),
            "Blockchain client initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Run `call` against each provider in turn until one succeeds.
    async fn with_failover<T, F, Fut>(&self, what: &'static str, call: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = BlockchainResult<T>>,
    {
        let start = Instant::now();
        let mut last_error = None;

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => {
                    metrics::record_upstream_call("node", "ok", start);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, call = what, error = %e, "RPC error, trying next provider");
                    last_error = Some(e);
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, call = what, "RPC timeout, trying next provider");
                }
            }
        }

        metrics::record_upstream_call("node", "unavailable", start);
        Err(last_error.unwrap_or_else(|| {
            BlockchainError::Rpc(format!("All RPC providers failed to {}", what))
        }))
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.with_failover("get chain id", |provider| async move {
            provider
                .get_chain_id()
                .await
                .map(ChainId)
                .map_err(|e| BlockchainError::Rpc(e.to_string()))
        })
        .await
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

#[async_trait]
impl TokenBalanceReader for BlockchainClient {
    async fn token_balance(&self, wallet: Address, token: Address) -> BlockchainResult<TokenBalance> {
        self.with_failover("read token balance", |provider| async move {
            let contract = IERC20::new(token, provider);
            let raw = contract
                .balanceOf(wallet)
                .call()
                .await
                .map_err(|e| BlockchainError::Contract(e.to_string()))?;
            let decimals = contract
                .decimals()
                .call()
                .await
                .map_err(|e| BlockchainError::Contract(e.to_string()))?;
            Ok(TokenBalance { raw, decimals })
        })
        .await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
