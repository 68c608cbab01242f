//! Error types for the user store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors a user store can report
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or failing mid-read
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Record rejected by the store
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
