//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding shared state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// Commit-time validation failed: a key read by this transaction was
    /// changed by another transaction that committed first.
    #[error("read conflict on key {key:?}")]
    Conflict { key: String },

    /// Failure reported by a host-provided backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StoreError {
    pub(crate) fn poisoned(err: impl std::fmt::Display) -> Self {
        StoreError::Poisoned(err.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
