//! Endpoint handlers.
//!
//! Handlers only extract, delegate to a service and shape the response;
//! status mapping lives in `response.rs`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use crate::blockchain::{fetch_token_balance, BalanceError};
use crate::http::request::{
    request_id, AddFileBody, BalanceQuery, HistoryQuery, LatestQuery, ValidQuery,
};
use crate::http::server::AppState;
use crate::ipfs::{FileContent, FileError};
use crate::transactions::{
    TransactionError, TransactionRecord, TransactionSummary, TransactionsResponse,
};

pub async fn latest_transactions(
    State(state): State<AppState>,
    Path(address): Path<String>,
    ValidQuery(query): ValidQuery<LatestQuery>,
    headers: HeaderMap,
) -> Result<Json<TransactionsResponse<TransactionRecord>>, TransactionError> {
    tracing::debug!(
        request_id = %request_id(&headers),
        address = %address,
        limit = ?query.limit,
        "Latest transactions requested"
    );
    let transactions = state
        .transactions
        .sync_latest(&address, query.limit.as_deref())
        .await
        .inspect_err(|e| log_failure(&headers, &address, e))?;
    Ok(Json(TransactionsResponse { transactions }))
}

pub async fn transaction_history(
    State(state): State<AppState>,
    Path(address): Path<String>,
    ValidQuery(query): ValidQuery<HistoryQuery>,
    headers: HeaderMap,
) -> Result<Json<TransactionsResponse<TransactionSummary>>, TransactionError> {
    let transactions = state
        .transactions
        .history(&address, query.date_from.as_deref(), query.date_to.as_deref())
        .await
        .inspect_err(|e| log_failure(&headers, &address, e))?;
    Ok(Json(TransactionsResponse { transactions }))
}

fn log_failure(headers: &HeaderMap, address: &str, error: &TransactionError) {
    if error.is_client_error() {
        tracing::debug!(request_id = %request_id(headers), address = %address, error = %error, "Request rejected");
    } else {
        tracing::error!(request_id = %request_id(headers), address = %address, error = %error, "Request failed");
    }
}

pub async fn add_file(
    State(state): State<AppState>,
    body: Result<Json<AddFileBody>, JsonRejection>,
) -> Result<Json<Value>, FileError> {
    // An unreadable body is treated the same as a missing `data` field.
    let data = match body {
        Ok(Json(body)) => body.data,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected add-file body");
            None
        }
    };
    let hash = state.files.add_file(data.as_deref()).await?;
    Ok(Json(json!({ "hash": hash })))
}

pub async fn get_file(
    State(state): State<AppState>,
    Path(file_hash): Path<String>,
) -> Result<Json<Value>, FileError> {
    let data = match state.files.get_file(&file_hash).await? {
        FileContent::Json(value) => value,
        FileContent::Text(text) => Value::String(text),
    };
    Ok(Json(json!({ "data": data })))
}

pub async fn token_balance(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<BalanceQuery>,
) -> Result<Json<Value>, BalanceError> {
    let balance = fetch_token_balance(
        state.balances.as_ref(),
        query.wallet_address.as_deref(),
        query.token_contract_address.as_deref(),
    )
    .await?;
    Ok(Json(json!({ "balance": balance })))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
