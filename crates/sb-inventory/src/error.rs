//! Inventory storage error types.

use thiserror::Error;

/// Errors that can occur during inventory storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

/// Convenience alias for inventory storage results.
pub type StoreResult<T> = Result<T, StoreError>;
