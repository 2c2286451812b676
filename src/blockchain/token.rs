//! ERC20 balance lookup for the token-balance endpoint.

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::client::TokenBalanceReader;
use crate::blockchain::types::BlockchainError;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("Invalid wallet address")]
    InvalidWallet,

    #[error("Invalid token contract address")]
    InvalidToken,

    #[error("Failed to fetch token balance")]
    Provider(#[from] BlockchainError),
}

/// Validate both addresses (wallet first) and return the whole-token balance
/// as a base-10 string.
pub async fn fetch_token_balance(
    reader: &dyn TokenBalanceReader,
    wallet: Option<&str>,
    token: Option<&str>,
) -> Result<String, BalanceError> {
    let wallet = parse_address(wallet).ok_or(BalanceError::InvalidWallet)?;
    let token = parse_address(token).ok_or(BalanceError::InvalidToken)?;

    let balance = reader.token_balance(wallet, token).await.map_err(|e| {
        tracing::error!(wallet = %wallet, token = %token, error = %e, "Error fetching token balance");
        BalanceError::Provider(e)
    })?;

    Ok(balance.whole_units().to_string())
}

fn parse_address(value: Option<&str>) -> Option<Address> {
    value.map(str::trim).and_then(|s| s.parse::<Address>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::{BlockchainResult, TokenBalance};
    use alloy::primitives::U256;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const TOKEN: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[derive(Default)]
    struct FixedReader {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TokenBalanceReader for FixedReader {
        async fn token_balance(&self, _wallet: Address, _token: Address) -> BlockchainResult<TokenBalance> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BlockchainError::Rpc("All RPC providers failed".to_string()));
            }
            Ok(TokenBalance {
                raw: U256::from(2_500_000_000u64),
                decimals: 6,
            })
        }
    }

    #[tokio::test]
    async fn test_balance_formatting() {
        let reader = FixedReader::default();
        let balance = fetch_token_balance(&reader, Some(WALLET), Some(TOKEN)).await.unwrap();
        assert_eq!(balance, "2500");
    }

    #[tokio::test]
    async fn test_address_validation_order() {
        let reader = FixedReader::default();

        let err = fetch_token_balance(&reader, Some("0x123"), Some("nope")).await.unwrap_err();
        assert!(matches!(err, BalanceError::InvalidWallet));

        let err = fetch_token_balance(&reader, Some(WALLET), None).await.unwrap_err();
        assert!(matches!(err, BalanceError::InvalidToken));

        let err = fetch_token_balance(&reader, None, Some(TOKEN)).await.unwrap_err();
        assert!(matches!(err, BalanceError::InvalidWallet));

        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure() {
        let reader = FixedReader { fail: true, ..Default::default() };
        let err = fetch_token_balance(&reader, Some(WALLET), Some(TOKEN)).await.unwrap_err();
        assert!(matches!(err, BalanceError::Provider(_)));
        assert_eq!(err.to_string(), "Failed to fetch token balance");
    }
}
