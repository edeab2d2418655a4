//! Error types for the localization layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`KeyValueStore`](crate::KeyValueStore) implementations
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error while reading or writing the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file does not hold a JSON object
    #[error("Store file {path:?} is corrupt: {reason}")]
    Corrupt {
        /// Backing file
        path: PathBuf,
        /// What was found instead
        reason: String,
    },

    /// Failure reported by a host-provided backend
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while constructing or configuring the layer
///
/// Lookups, overrides and resets never fail; only setup does.
#[derive(Error, Debug)]
pub enum LayerError {
    /// The layer was created outside of a tokio runtime
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// A locale identifier is not a valid language tag
    #[error("Invalid locale '{locale}': {reason}")]
    InvalidLocale {
        /// The rejected identifier
        locale: String,
        /// Parser message
        reason: String,
    },

    /// A language document could not be decoded
    #[error("Invalid language document: {0}")]
    InvalidLanguage(#[from] serde_json::Error),
}

/// Result type for layer setup operations
pub type LayerResult<T> = Result<T, LayerError>;

/// A serialized message kind outside the known range
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown message kind: {0}")]
pub struct UnknownMessageKind(pub u8);
