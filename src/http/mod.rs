//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace span, body limit, timeout, metrics)
//!     → request.rs (query and body shapes)
//!     → handlers.rs (delegate to the transactions, ipfs or blockchain services)
//!     → response.rs (domain error → status + { error })
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
