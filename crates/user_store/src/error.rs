//! User store error types.

use thiserror::Error;

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema sync error.
    #[error("Migration error: {0}")]
    Migration(String),
}

/// Result type for user store operations.
pub type StoreResult<T> = Result<T, StoreError>;
