//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;
use traffic_overlay::OverlayError;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its format.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The overlay engine refused the request.
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// Failed to create the Tokio runtime.
    #[error("Failed to create Tokio runtime: {0}")]
    Runtime(String),

    /// Failed to install the Ctrl-C handler.
    #[error("Failed to install signal handler: {0}")]
    Signal(String),
}
