//! Latest-transactions sync and history queries.

use std::sync::Arc;

use crate::config::{ExplorerConfig, MAX_LIMIT_CEILING};
use crate::observability::metrics;
use crate::storage::TransactionStore;
use crate::transactions::date_range::parse_range;
use crate::transactions::explorer::TransactionProvider;
use crate::transactions::reconcile::reconcile;
use crate::transactions::types::{TransactionError, TransactionRecord, TransactionSummary};

/// Page-size policy for the latest endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    pub default: u32,
    pub max: u32,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self { default: 5, max: MAX_LIMIT_CEILING }
    }
}

impl From<&ExplorerConfig> for LimitPolicy {
    fn from(config: &ExplorerConfig) -> Self {
        let max = config.max_limit.min(MAX_LIMIT_CEILING);
        Self {
            default: config.default_limit.min(max),
            max,
        }
    }
}

impl LimitPolicy {
    /// Resolve the raw `limit` query value. Absent or empty means the default.
    pub fn resolve(&self, raw: Option<&str>) -> Result<u32, TransactionError> {
        let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => return Ok(self.default),
        };
        match raw.parse::<u32>() {
            Ok(limit) if (1..=self.max).contains(&limit) => Ok(limit),
            _ => Err(TransactionError::InvalidLimit { max: self.max }),
        }
    }
}

/// Fetch-and-cache plus history lookups over injected collaborators.
#[derive(Clone)]
pub struct TransactionService {
    provider: Arc<dyn TransactionProvider>,
    store: Arc<dyn TransactionStore>,
    limits: LimitPolicy,
}

impl TransactionService {
    pub fn new(
        provider: Arc<dyn TransactionProvider>,
        store: Arc<dyn TransactionStore>,
        limits: LimitPolicy,
    ) -> Self {
        Self { provider, store, limits }
    }

    /// Fetch the latest page for `address`, cache the well-formed entries and
    /// return them in provider order.
    pub async fn sync_latest(
        &self,
        address: &str,
        limit: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, TransactionError> {
        let limit = self.limits.resolve(limit)?;

        let raw = self.provider.latest_transactions(address, limit).await?;
        let fetched = raw.len();
        let reconciled = reconcile(raw)?;

        if reconciled.dropped > 0 {
            tracing::debug!(
                address = %address,
                dropped = reconciled.dropped,
                "Skipped execution-errored transactions"
            );
            metrics::record_dropped_transactions(reconciled.dropped);
        }

        if !reconciled.records.is_empty() {
            let written = self.store.upsert_transactions(&reconciled.records).await.map_err(|e| {
                tracing::error!(address = %address, error = %e, "Failed to persist transactions");
                TransactionError::StorageUnavailable(e)
            })?;
            metrics::record_persisted_transactions(reconciled.records.len());
            tracing::debug!(address = %address, written, "Transactions persisted");
        }

        tracing::info!(
            address = %address,
            limit,
            fetched,
            returned = reconciled.records.len(),
            "Latest transactions synced"
        );
        Ok(reconciled.records)
    }

    /// Cached transactions sent by `address` inside the given date range,
    /// newest first.
    pub async fn history(
        &self,
        address: &str,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Vec<TransactionSummary>, TransactionError> {
        let bounds = parse_range(date_from, date_to)?;

        let transactions = self.store.find_by_sender(address, bounds).await.map_err(|e| {
            tracing::error!(address = %address, error = %e, "Database query error");
            TransactionError::StorageUnavailable(e)
        })?;

        tracing::debug!(
            address = %address,
            from = ?bounds.from,
            to = ?bounds.to,
            count = transactions.len(),
            "History query served"
        );
        Ok(transactions)
    }
}
