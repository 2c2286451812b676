//! Blockchain data gateway library.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod ipfs;
pub mod lifecycle;
pub mod observability;
pub mod storage;
pub mod transactions;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
