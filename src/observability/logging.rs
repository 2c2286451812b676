//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and to tower-http request spans.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is absent.
pub fn default_directive(level: &str) -> String {
    format!("chain_gateway={level},tower_http={level}")
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("debug"), "chain_gateway=debug,tower_http=debug");
    }

    #[test]
    fn test_init_twice() {
        init_logging("info");
        init_logging("debug");
    }
}
