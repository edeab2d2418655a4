//! Application-wide error types using thiserror.

use std::path::PathBuf;
use wet_common::WetError;
use wet_config::ConfigError;
use wet_layer::LayerError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Localization layer error.
    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),

    /// Error from shared infrastructure such as logging.
    #[error(transparent)]
    Common(#[from] WetError),

    /// A language or catalog file could not be read.
    #[error("Failed to read {path:?}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The inbound event channel stopped before the command finished.
    #[error("Event channel closed: {0}")]
    Channel(String),
}

/// Result type for the command-line application.
pub type CliResult<T> = Result<T, CliError>;
