//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, overlay env secrets)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → consumed once by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Secrets come from the environment, never from the file on disk
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    BlockchainConfig, ExplorerConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    PinningConfig, RoutesConfig, StorageConfig, TimeoutConfig, MAX_LIMIT_CEILING,
};
