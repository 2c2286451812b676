//! Crypto-transactions subsystem.
//!
//! # Data Flow
//! ```text
//! GET /:address/latest?limit=N
//!     → service.rs (limit policy)
//!     → explorer.rs (one txlist call, envelope decoding)
//!     → reconcile.rs (drop errored entries, normalize)
//!     → storage (bulk upsert keyed by hash)
//!     → { transactions: [...] }
//!
//! GET /:address?dateFrom=..&dateTo=..
//!     → date_range.rs (presence, pattern, calendar, ordering)
//!     → storage (sender + createdTS bounds, newest first)
//!     → { transactions: [...] }
//! ```
//!
//! # Design Decisions
//! - The two flows share the record model but never call each other
//! - A failed cache write fails the request
//! - Dates are UTC calendar days

pub mod date_range;
pub mod explorer;
pub mod reconcile;
pub mod service;
pub mod types;

pub use explorer::{EtherscanClient, TransactionProvider};
pub use service::{LimitPolicy, TransactionService};
pub use types::{TransactionError, TransactionRecord, TransactionSummary, TransactionsResponse};
