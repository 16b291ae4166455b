//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for aggregation, pretty format for development
//! - Filter comes from config, `RUST_LOG` or `--log-level` (see `config::cli`)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig, DEFAULT_LOG_FILTER};

/// Build the filter, falling back to the default on a malformed directive.
pub fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("invalid log filter {filter:?} ({e}); using {DEFAULT_LOG_FILTER:?}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// Install the global subscriber.
///
/// Libraries and tests should not call this; they scope a subscriber with
/// `tracing::subscriber::with_default` or pass a span to the component.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(&config.filter));

    match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_filter_is_kept() {
        let filter = env_filter("graceful_tls=debug");
        assert_eq!(filter.to_string(), "graceful_tls=debug");
    }

    #[test]
    fn malformed_filter_falls_back() {
        let filter = env_filter("graceful_tls=notalevel");
        assert_eq!(filter.to_string(), EnvFilter::new(DEFAULT_LOG_FILTER).to_string());
    }
}
