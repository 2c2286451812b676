//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config + INFURA_API_KEY (RPC URL)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → token.rs (address validation, ERC20 balanceOf/decimals, formatting)
//! ```
//!
//! # Security Constraints
//! - API keys ONLY from environment variables
//! - Never log API keys (the primary URL is logged without its key)
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod token;
pub mod types;

pub use client::{BlockchainClient, TokenBalanceReader};
pub use token::{fetch_token_balance, BalanceError};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TokenBalance};
