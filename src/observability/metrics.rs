//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_calls_total` (counter): third-party calls by provider, outcome
//! - `gateway_upstream_duration_seconds` (histogram): third-party latency by provider
//! - `gateway_transactions_persisted_total` (counter)
//! - `gateway_transactions_dropped_total` (counter): execution-errored entries skipped

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_call(provider: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_upstream_calls_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_upstream_duration_seconds", "provider" => provider)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_persisted_transactions(count: usize) {
    metrics::counter!("gateway_transactions_persisted_total").increment(count as u64);
}

pub fn record_dropped_transactions(count: usize) {
    metrics::counter!("gateway_transactions_dropped_total").increment(count as u64);
}

/// Middleware recording one sample per request, labelled by matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
