//! Error types for dialect setup and classification.

use thiserror::Error;

/// Main error type for dialect operations.
///
/// All variants are fatal at connection setup. Per-statement clause
/// rewriting never fails: missing optional context (no ORDER BY, no
/// schema, no pagination) always has a defined fallback.
#[derive(Error, Debug)]
pub enum DialectError {
    /// The server identity probe returned an empty version or edition string.
    #[error("no product {0} provided")]
    MissingIdentity(&'static str),

    /// The major-version segment of the product version is not an integer.
    #[error("invalid product version {version:?}: major segment is not numeric")]
    MalformedVersion { version: String },

    /// The host connection failed while probing the server identity or
    /// executing a passthrough command.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
