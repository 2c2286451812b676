//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables overlaid on top of the file.
pub const ENV_ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
pub const ENV_PINATA_JWT: &str = "PINATA_JWT_TOKEN";
pub const ENV_PINATA_GATEWAY: &str = "PINATA_GATEWAY";
pub const ENV_INFURA_API_KEY: &str = "INFURA_API_KEY";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, with secrets taken
/// from the process environment.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus the environment, for running
/// without a config file.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();
    apply_env(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay secrets and deployment-specific values. Empty variables are ignored.
pub fn apply_env<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(ENV_ETHERSCAN_API_KEY) {
        config.explorer.api_key = Some(key);
    }
    if let Some(jwt) = get(ENV_PINATA_JWT) {
        config.pinning.jwt = Some(jwt);
    }
    if let Some(gateway) = get(ENV_PINATA_GATEWAY) {
        config.pinning.gateway = gateway;
    }
    if let Some(key) = get(ENV_INFURA_API_KEY) {
        config.blockchain.api_key = Some(key);
    }
    if let Some(url) = get(ENV_DATABASE_URL) {
        config.storage.database_url = url;
    }
}
