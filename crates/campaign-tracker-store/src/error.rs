//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tracker is closed: `open` was never called, or `close` was.
    ///
    /// Not retryable. Callers must open the tracker before use.
    #[error("view tracker unavailable: the store is not open")]
    TrackerUnavailable,

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state lock was poisoned by a panicking caller.
    #[error("tracker state poisoned: {0}")]
    Poisoned(String),
}

impl StoreError {
    /// Whether this is the closed-tracker failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::TrackerUnavailable)
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
