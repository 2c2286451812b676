//! Chain-specific types and error definitions.

use alloy::primitives::U256;
use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Contract call reverted or returned undecodable data.
    #[error("Contract call failed: {0}")]
    Contract(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Address string is not a 20-byte hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Raw ERC20 balance together with the token's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    pub raw: U256,
    pub decimals: u8,
}

impl TokenBalance {
    /// Whole-token balance, truncated: `floor(raw / 10^decimals)`.
    pub fn whole_units(&self) -> U256 {
        match U256::from(10u8).checked_pow(U256::from(self.decimals)) {
            Some(scale) => self.raw / scale,
            None => U256::ZERO,
        }
    }
}
