//! Logging setup
//!
//! Installs a `tracing_subscriber` fmt subscriber. `RUST_LOG` wins over the
//! configured level when it is set.

use crate::config::LoggingConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialize the global subscriber
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init(config: &LoggingConfig) {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .try_init()
    {
        debug!("Keeping the existing log subscriber: {}", e);
    }
}
