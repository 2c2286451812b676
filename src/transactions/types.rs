//! Transaction entities and the error taxonomy of the transactions endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::storage::StorageError;

/// Canonical transaction record as cached and returned by the latest endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: String,
    pub block_number: String,
    pub sender: String,
    /// Absent for contract-creation transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Present only for contract-creation transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    /// Transferred value in wei.
    pub value: u128,
    pub gas_used: u64,
    #[serde(rename = "createdTS")]
    pub created_ts: i64,
}

/// A stored transaction with the sender projected out, as returned by the
/// history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub hash: String,
    pub block_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub value: u128,
    pub gas_used: u64,
    #[serde(rename = "createdTS")]
    pub created_ts: i64,
}

impl From<TransactionRecord> for TransactionSummary {
    fn from(record: TransactionRecord) -> Self {
        Self {
            hash: record.hash,
            block_number: record.block_number,
            receiver: record.receiver,
            contract_address: record.contract_address,
            value: record.value,
            gas_used: record.gas_used,
            created_ts: record.created_ts,
        }
    }
}

/// Response body of both transactions endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse<T> {
    pub transactions: Vec<T>,
}

/// Which side of a date range a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    From,
    To,
}

impl DateBound {
    /// The query parameter carrying this bound.
    pub fn param(self) -> &'static str {
        match self {
            DateBound::From => "dateFrom",
            DateBound::To => "dateTo",
        }
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// Errors that can occur while serving the transactions endpoints.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Requested page size is above the ceiling or not a positive integer.
    #[error("Up to {max} is allowed")]
    InvalidLimit { max: u32 },

    /// The provider could not be reached or returned an unusable body.
    #[error("transaction provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The provider answered with a "not ok" envelope.
    #[error("{0}")]
    UpstreamRejected(String),

    /// The persistent store failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("At least one of date ranges must be set")]
    MissingDateRange,

    #[error("Failed to parse {0}: Invalid pattern provided: must be YYYY-MM-DD")]
    MalformedDate(DateBound),

    #[error("Failed to parse {0}: Invalid date value provided")]
    InvalidDate(DateBound),

    #[error("dateFrom must be lower than dateTo")]
    RangeInverted,
}

impl TransactionError {
    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            TransactionError::UpstreamUnavailable(_) | TransactionError::StorageUnavailable(_)
        )
    }
}
