//! Error types for the tracker facade.

use campaign_tracker_store::StoreError;
use thiserror::Error;

/// Errors that can occur during tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Storage error, including the closed-tracker failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The blocking task running a storage call panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl TrackerError {
    /// Whether the tracker was closed when the call was made.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TrackerError::Store(e) if e.is_unavailable())
    }
}

impl From<tokio::task::JoinError> for TrackerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
