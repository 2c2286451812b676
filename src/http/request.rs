//! Request extraction types.
//!
//! # Responsibilities
//! - Query and body shapes accepted by each endpoint
//! - Request ID access for log correlation
//!
//! Query values are taken as raw strings so validation (and its error
//! messages) stays in the services rather than in extractor rejections.

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderMap, StatusCode},
    response::Response,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::http::response::error_response;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID set by the request-id layer, or "unknown".
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// `Query` whose rejection is rendered as `{ "error": .. }`.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(uri = %parts.uri, error = %rejection, "Rejected query string");
                Err(error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    pub wallet_address: Option<String>,
    pub token_contract_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddFileBody {
    pub data: Option<String>,
}
