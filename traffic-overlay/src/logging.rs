//! Logging setup for binaries embedding the engine.
//!
//! The library itself only emits `tracing` events. Binaries call
//! [`init_logging`] once at startup to print them to stderr.

use tracing_subscriber::EnvFilter;

/// Errors from logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Default filter when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "traffic_overlay=debug,info"
    } else {
        "info"
    }
}

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over the `verbose` default.
pub fn init_logging(verbose: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
