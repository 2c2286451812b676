//! SQLite-backed store for cached transactions and pinned files.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

use crate::config::StorageConfig;
use crate::storage::{
    FileRegistry, PinnedFile, StorageError, StorageResult, TimeBounds, TransactionStore,
};
use crate::transactions::types::{TransactionRecord, TransactionSummary};

/// Store wrapper around a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Row type for history queries (sender is never selected).
#[derive(FromRow)]
struct TransactionRow {
    hash: String,
    block_number: String,
    receiver: Option<String>,
    contract_address: Option<String>,
    value: String,
    gas_used: i64,
    created_ts: i64,
}

impl TryFrom<TransactionRow> for TransactionSummary {
    type Error = StorageError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let value = row.value.parse::<u128>().map_err(|e| StorageError::Corrupt {
            hash: row.hash.clone(),
            reason: format!("value '{}': {}", row.value, e),
        })?;
        let gas_used = u64::try_from(row.gas_used).map_err(|e| StorageError::Corrupt {
            hash: row.hash.clone(),
            reason: format!("gas_used {}: {}", row.gas_used, e),
        })?;
        Ok(Self {
            hash: row.hash,
            block_number: row.block_number,
            receiver: row.receiver,
            contract_address: row.contract_address,
            value,
            gas_used,
            created_ts: row.created_ts,
        })
    }
}

#[derive(FromRow)]
struct PinnedFileRow {
    hash: String,
    created_at: DateTime<Utc>,
}

impl SqliteStore {
    /// Open (creating if needed) the database described by `config`.
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        tracing::info!(database_url = %config.database_url, "Storage initialized");
        Ok(store)
    }

    /// A private in-memory database on a single, never-recycled connection.
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> StorageResult<()> {
        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS crypto_transactions (
                hash TEXT PRIMARY KEY,
                block_number TEXT NOT NULL,
                sender TEXT NOT NULL,
                receiver TEXT,
                contract_address TEXT,
                value TEXT NOT NULL,
                gas_used INTEGER NOT NULL,
                created_ts INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_crypto_transactions_sender_created
             ON crypto_transactions (sender, created_ts DESC)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS ipfs_files (
                hash TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of cached transactions.
    pub async fn transaction_count(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM crypto_transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn upsert_transactions(&self, records: &[TransactionRecord]) -> StorageResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for record in records {
            let gas_used = i64::try_from(record.gas_used).map_err(|e| StorageError::Corrupt {
                hash: record.hash.clone(),
                reason: format!("gas_used {}: {}", record.gas_used, e),
            })?;
            let result = sqlx::query(
                "INSERT INTO crypto_transactions
                 (hash, block_number, sender, receiver, contract_address, value, gas_used, created_ts)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(hash) DO UPDATE SET
                    block_number = excluded.block_number,
                    sender = excluded.sender,
                    receiver = excluded.receiver,
                    contract_address = excluded.contract_address,
                    value = excluded.value,
                    gas_used = excluded.gas_used,
                    created_ts = excluded.created_ts",
            )
            .bind(&record.hash)
            .bind(&record.block_number)
            .bind(&record.sender)
            .bind(&record.receiver)
            .bind(&record.contract_address)
            .bind(record.value.to_string())
            .bind(gas_used)
            .bind(record.created_ts)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    async fn find_by_sender(
        &self,
        sender: &str,
        bounds: TimeBounds,
    ) -> StorageResult<Vec<TransactionSummary>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT hash, block_number, receiver, contract_address, value, gas_used, created_ts
             FROM crypto_transactions WHERE sender = ",
        );
        query.push_bind(sender);
        if let Some(from) = bounds.from {
            query.push(" AND created_ts >= ").push_bind(from);
        }
        if let Some(to) = bounds.to {
            query.push(" AND created_ts <= ").push_bind(to);
        }
        query.push(" ORDER BY created_ts DESC");

        let rows: Vec<TransactionRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(TransactionSummary::try_from).collect()
    }
}

#[async_trait]
impl FileRegistry for SqliteStore {
    async fn register_file(&self, hash: &str) -> StorageResult<()> {
        sqlx::query("INSERT INTO ipfs_files (hash, created_at) VALUES (?, ?) ON CONFLICT(hash) DO NOTHING")
            .bind(hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_file(&self, hash: &str) -> StorageResult<Option<PinnedFile>> {
        let row: Option<PinnedFileRow> =
            sqlx::query_as("SELECT hash, created_at FROM ipfs_files WHERE hash = ?")
                .bind(hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| PinnedFile {
            hash: r.hash,
            created_at: r.created_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str, sender: &str, created_ts: i64) -> TransactionRecord {
        TransactionRecord {
            hash: hash.to_string(),
            block_number: "100".to_string(),
            sender: sender.to_string(),
            receiver: Some("0xreceiver".to_string()),
            contract_address: None,
            value: 42,
            gas_used: 21000,
            created_ts,
        }
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();

        store.upsert_transactions(&[record("0x1", "0xs", 100)]).await.unwrap();
        assert_eq!(store.transaction_count().await.unwrap(), 1);

        let mut changed = record("0x1", "0xs", 100);
        changed.value = u128::MAX;
        changed.gas_used = 50000;
        store.upsert_transactions(&[changed]).await.unwrap();
        assert_eq!(store.transaction_count().await.unwrap(), 1);

        let rows = store.find_by_sender("0xs", TimeBounds::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, u128::MAX);
        assert_eq!(rows[0].gas_used, 50000);
    }

    #[tokio::test]
    async fn test_oversized_gas_rejects_whole_batch() {
        let store = SqliteStore::in_memory().await.unwrap();

        let mut huge = record("0x2", "0xs", 200);
        huge.gas_used = u64::MAX;
        let err = store
            .upsert_transactions(&[record("0x1", "0xs", 100), huge])
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Corrupt { ref hash, .. } if hash == "0x2"));
        assert_eq!(store.transaction_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_sender_bounds_and_order() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .upsert_transactions(&[
                record("0xa", "0xs", 100),
                record("0xb", "0xs", 200),
                record("0xc", "0xs", 300),
                record("0xd", "0xother", 250),
            ])
            .await
            .unwrap();

        let rows = store
            .find_by_sender("0xs", TimeBounds { from: Some(150), to: None })
            .await
            .unwrap();
        let timestamps: Vec<i64> = rows.iter().map(|r| r.created_ts).collect();
        assert_eq!(timestamps, vec![300, 200]);

        let rows = store
            .find_by_sender("0xs", TimeBounds { from: Some(100), to: Some(200) })
            .await
            .unwrap();
        let hashes: Vec<&str> = rows.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xb", "0xa"]);

        let rows = store
            .find_by_sender("0xnobody", TimeBounds { from: Some(0), to: None })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_file_registry() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.find_file("QmHash").await.unwrap().is_none());

        store.register_file("QmHash").await.unwrap();
        store.register_file("QmHash").await.unwrap();

        let file = store.find_file("QmHash").await.unwrap().unwrap();
        assert_eq!(file.hash, "QmHash");
        assert!(file.created_at <= Utc::now());
    }
}
