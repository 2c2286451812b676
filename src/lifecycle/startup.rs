//! Startup orchestration.
//!
//! Subsystems initialize in dependency order: store first, then the
//! upstream clients, then the services that tie them together. Any
//! failure here is fatal.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::{BlockchainClient, BlockchainError};
use crate::config::GatewayConfig;
use crate::http::AppState;
use crate::ipfs::{FileService, PinataClient, PinningError};
use crate::storage::{SqliteStore, StorageError};
use crate::transactions::explorer::ExplorerError;
use crate::transactions::{EtherscanClient, LimitPolicy, TransactionService};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open store: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to build explorer client: {0}")]
    Explorer(#[from] ExplorerError),

    #[error("failed to build pinning client: {0}")]
    Pinning(#[from] PinningError),

    #[error("failed to build blockchain client: {0}")]
    Blockchain(#[from] BlockchainError),
}

/// Everything `main` needs after startup.
pub struct Subsystems {
    pub state: AppState,
    pub store: Arc<SqliteStore>,
    pub blockchain: Arc<BlockchainClient>,
}

/// Open the store and construct every client once.
pub async fn build_state(config: &GatewayConfig) -> Result<Subsystems, StartupError> {
    let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);

    let store = Arc::new(SqliteStore::connect(&config.storage).await?);

    let explorer = Arc::new(EtherscanClient::new(&config.explorer, upstream_timeout)?);
    let transactions = TransactionService::new(
        explorer,
        store.clone(),
        LimitPolicy::from(&config.explorer),
    );

    let pinning = Arc::new(PinataClient::new(&config.pinning, upstream_timeout)?);
    let files = FileService::new(pinning, store.clone());

    let blockchain = Arc::new(BlockchainClient::new(config.blockchain.clone())?);

    tracing::info!(
        database = %config.storage.database_url,
        explorer = %config.explorer.base_url,
        "Subsystems initialized"
    );

    Ok(Subsystems {
        state: AppState {
            transactions: Arc::new(transactions),
            files: Arc::new(files),
            balances: blockchain.clone(),
        },
        store,
        blockchain,
    })
}
