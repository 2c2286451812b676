//! Response shaping and error-to-status mapping.
//!
//! # Responsibilities
//! - Render every failure as `{ "error": "<message>" }`
//! - Map domain errors to status codes (validation → 400, upstream/storage → 522)
//! - Keep internal error details in logs, out of responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::BalanceError;
use crate::ipfs::FileError;
use crate::transactions::TransactionError;

/// Non-standard "origin unreachable" status used for upstream and storage failures.
pub const UPSTREAM_UNAVAILABLE_CODE: u16 = 522;

pub fn upstream_unavailable() -> StatusCode {
    StatusCode::from_u16(UPSTREAM_UNAVAILABLE_CODE).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        match &self {
            TransactionError::UpstreamUnavailable(_) => {
                error_response(upstream_unavailable(), "API is temporary unavailable")
            }
            TransactionError::StorageUnavailable(_) => error_response(
                upstream_unavailable(),
                "An error occurred while fetching transactions.",
            ),
            _ => error_response(StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}

impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        match &self {
            FileError::NoData | FileError::MissingHash | FileError::NotFound => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            FileError::PinningUnavailable(e) => {
                tracing::error!(error = %e, "Pinning service call failed");
                error_response(upstream_unavailable(), "File storage is temporary unavailable")
            }
            FileError::StorageUnavailable(e) => {
                tracing::error!(error = %e, "File registry query failed");
                error_response(upstream_unavailable(), "An error occurred while accessing file registry.")
            }
        }
    }
}

impl IntoResponse for BalanceError {
    fn into_response(self) -> Response {
        let status = match &self {
            BalanceError::InvalidWallet | BalanceError::InvalidToken => StatusCode::BAD_REQUEST,
            BalanceError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.to_string())
    }
}
