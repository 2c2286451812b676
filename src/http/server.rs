//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers under their configured prefixes
//! - Wire up middleware (tracing, timeout, body limit, request ID, metrics)
//! - Bind the server to a listener and drain on shutdown

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::TokenBalanceReader;
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::ipfs::FileService;
use crate::observability::metrics;
use crate::transactions::TransactionService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<TransactionService>,
    pub files: Arc<FileService>,
    pub balances: Arc<dyn TokenBalanceReader>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &GatewayConfig, state: AppState) -> Self {
        Self {
            router: build_router(config, state),
        }
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until a shutdown signal arrives, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    let routes = &config.routes;

    Router::new()
        .route(
            &format!("{}/{{address}}/latest", routes.transactions_prefix),
            get(handlers::latest_transactions),
        )
        .route(
            &format!("{}/{{address}}", routes.transactions_prefix),
            get(handlers::transaction_history),
        )
        .route(&format!("{}/add-file", routes.ipfs_prefix), post(handlers::add_file))
        .route(
            &format!("{}/get-file/{{file_hash}}", routes.ipfs_prefix),
            get(handlers::get_file),
        )
        .route(&routes.balance_prefix, get(handlers::token_balance))
        .route("/health", get(handlers::health))
        .route_layer(middleware::from_fn(metrics::track_requests))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
