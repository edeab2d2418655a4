//! Error types shared across the WET workspace

use thiserror::Error;

/// Result type alias for WET operations
pub type Result<T> = std::result::Result<T, WetError>;

/// Errors raised by the shared infrastructure
#[derive(Error, Debug)]
pub enum WetError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),
}
