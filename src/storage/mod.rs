//! Persistent store subsystem.
//!
//! # Data Flow
//! ```text
//! transactions::service ──upsert_transactions──▶ ┐
//!                       ──find_by_sender──────▶ ├─ TransactionStore ─┐
//! ipfs::service ─────────register_file─────────▶ ┐                   ├─ sqlite.rs (sqlx pool)
//!                        ─find_file────────────▶ ├─ FileRegistry ─────┘
//! ```
//!
//! # Design Decisions
//! - Services only see the traits; the SQLite pool is built once at startup
//! - Upserts are keyed by hash and applied in one transaction per batch
//! - Reads return rows already ordered by the store

pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::transactions::types::{TransactionRecord, TransactionSummary};

pub use sqlite::SqliteStore;

/// Errors raised by the persistent store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Driver, connection or query failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be decoded into the domain type.
    #[error("corrupt row for {hash}: {reason}")]
    Corrupt { hash: String, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Unix-second bounds applied to `createdTS`, both inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// Transaction cache keyed by hash.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert or overwrite every record, keyed by `hash`, in a single write.
    async fn upsert_transactions(&self, records: &[TransactionRecord]) -> StorageResult<u64>;

    /// All records sent by `sender` within `bounds`, newest first.
    async fn find_by_sender(
        &self,
        sender: &str,
        bounds: TimeBounds,
    ) -> StorageResult<Vec<TransactionSummary>>;
}

/// A CID registered after a successful pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedFile {
    pub hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registry of content pinned through this gateway.
#[async_trait]
pub trait FileRegistry: Send + Sync {
    /// Record a pinned hash. Registering an existing hash is a no-op.
    async fn register_file(&self, hash: &str) -> StorageResult<()>;

    async fn find_file(&self, hash: &str) -> StorageResult<Option<PinnedFile>>;
}
