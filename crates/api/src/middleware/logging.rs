//! Logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initializes the tracing subscriber from configuration.
///
/// A `RUST_LOG` environment variable wins over the configured level.
/// The "json" format produces machine-readable output for aggregation;
/// anything else selects the human-readable pretty format.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}
