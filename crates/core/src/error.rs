//! Error types for Stateful
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Failures are never retried internally. A multi-key splice interrupted by an
//! error is left as-is; retry policy belongs to the caller.

use thiserror::Error;

/// Result type alias for Stateful operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Stateful
#[derive(Debug, Error)]
pub enum Error {
    /// Index or insert position outside the valid bounds
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Length the index was checked against
        len: u64,
    },

    /// Dictionary add with a key that is already present
    #[error("Duplicate key: key already exists")]
    DuplicateKey,

    /// Array opened with a length that differs from the persisted one
    #[error("Inconsistent length: configured {configured}, persisted {persisted}")]
    InconsistentLength {
        /// Length supplied when the handle was created
        configured: u64,
        /// Length found in the store
        persisted: u64,
    },

    /// Operation on a unit whose lifecycle has ended
    #[error("Unit is disposed")]
    DisposedUnit,

    /// A required record is missing from the store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Add of a record that is already present in the store
    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Lookup of a state name that was never registered
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// Lookup of a registered state with the wrong kind or element type
    #[error("Type mismatch for state '{name}': expected {expected}, registered {registered}")]
    TypeMismatch {
        /// State name
        name: String,
        /// Requested kind and types
        expected: String,
        /// Registered kind and types
        registered: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an `IndexOutOfRange` from any signed index
    pub fn index_out_of_range(index: i64, len: u64) -> Self {
        Error::IndexOutOfRange { index, len }
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
