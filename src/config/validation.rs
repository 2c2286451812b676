//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits sane)
//! - Check route prefixes are mountable and distinct
//! - Check upstream URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, MAX_LIMIT_CEILING};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: prefix '{value}' must start with '/', not end with '/' and contain no braces")]
    InvalidPrefix { field: &'static str, value: String },

    #[error("route prefix '{0}' is used by more than one endpoint group")]
    DuplicatePrefix(String),

    #[error("explorer.max_limit ({max}) exceeds the ceiling of {ceiling}")]
    LimitAboveCeiling { max: u32, ceiling: u32 },

    #[error("explorer.default_limit ({default}) exceeds explorer.max_limit ({max})")]
    DefaultLimitAboveMax { default: u32, max: u32 },

    #[error("storage.database_url must be a sqlite URL, got '{0}'")]
    UnsupportedDatabase(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_body_size" });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.upstream_secs" });
    }

    let prefixes = [
        ("routes.transactions_prefix", &config.routes.transactions_prefix),
        ("routes.ipfs_prefix", &config.routes.ipfs_prefix),
        ("routes.balance_prefix", &config.routes.balance_prefix),
    ];
    for (field, value) in prefixes {
        if !value.starts_with('/')
            || value.ends_with('/')
            || value.len() < 2
            || value.contains(['{', '}'])
        {
            errors.push(ValidationError::InvalidPrefix { field, value: value.clone() });
        }
    }
    for (i, (_, a)) in prefixes.iter().enumerate() {
        if prefixes[i + 1..].iter().any(|(_, b)| a == b) {
            errors.push(ValidationError::DuplicatePrefix((*a).clone()));
        }
    }

    if config.storage.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "storage.max_connections" });
    }
    if !config.storage.database_url.starts_with("sqlite:") {
        errors.push(ValidationError::UnsupportedDatabase(config.storage.database_url.clone()));
    }

    check_url(&mut errors, "explorer.base_url", &config.explorer.base_url);
    if config.explorer.max_limit == 0 {
        errors.push(ValidationError::Zero { field: "explorer.max_limit" });
    } else if config.explorer.max_limit > MAX_LIMIT_CEILING {
        errors.push(ValidationError::LimitAboveCeiling {
            max: config.explorer.max_limit,
            ceiling: MAX_LIMIT_CEILING,
        });
    }
    if config.explorer.default_limit == 0 {
        errors.push(ValidationError::Zero { field: "explorer.default_limit" });
    } else if config.explorer.default_limit > config.explorer.max_limit {
        errors.push(ValidationError::DefaultLimitAboveMax {
            default: config.explorer.default_limit,
            max: config.explorer.max_limit,
        });
    }

    check_url(&mut errors, "pinning.api_url", &config.pinning.api_url);

    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    for url in &config.blockchain.failover_urls {
        check_url(&mut errors, "blockchain.failover_urls", url);
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "blockchain.rpc_timeout_secs" });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl { field, value: value.to_string() });
    }
}
