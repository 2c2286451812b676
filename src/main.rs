//! Blockchain data gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                     GATEWAY                      │
//!   Client         │  ┌────────┐   ┌──────────────┐   ┌────────────┐  │
//!   ───────────────┼─▶│  http  │──▶│ transactions │──▶│  explorer  │──┼──▶ Etherscan
//!                  │  │ server │   │   service    │   └────────────┘  │
//!                  │  └───┬────┘   └──────┬───────┘                   │
//!                  │      │               ▼                           │
//!                  │      │        ┌──────────────┐                   │
//!                  │      ├───────▶│   storage    │  (SQLite)         │
//!                  │      │        └──────────────┘                   │
//!                  │      │        ┌──────────────┐                   │
//!                  │      ├───────▶│     ipfs     │───────────────────┼──▶ Pinata
//!                  │      │        └──────────────┘                   │
//!                  │      │        ┌──────────────┐                   │
//!                  │      └───────▶│  blockchain  │───────────────────┼──▶ JSON-RPC node
//!                  │               └──────────────┘                   │
//!                  └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use chain_gateway::config::{load_config, load_from_env};
use chain_gateway::lifecycle::{build_state, wait_for_signal, Shutdown};
use chain_gateway::observability::{logging, metrics};
use chain_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "chain-gateway", version, about = "Blockchain data gateway")]
struct Args {
    /// Path to a TOML config file. Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "chain-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let subsystems = build_state(&config).await?;

    // A wrong network only affects the balance endpoint, so keep serving.
    let blockchain = subsystems.blockchain.clone();
    tokio::spawn(async move {
        if let Err(e) = blockchain.verify_chain_id().await {
            tracing::warn!(error = %e, "Chain ID verification failed");
        }
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, subsystems.state);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();

    server_task.await??;
    subsystems.store.close().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
