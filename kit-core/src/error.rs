//! Error types for the keepintouch core library.

use thiserror::Error;

/// Top-level error type for all keepintouch operations.
///
/// Only store and configuration failures are ever fatal; cache problems are
/// handled locally as a cache miss and never surface through this type.
#[derive(Error, Debug)]
pub enum KitError {
    /// SQLite store error (store unreachable, schema failure, bad row).
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored value did not fit the domain (bad event type, rating, date).
    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, KitError>;
