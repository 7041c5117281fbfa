//! Account store error types.

use thiserror::Error;

/// Errors that can occur during account store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Account not found.
    #[error("Account not found: {id}")]
    NotFound { id: String },

    /// An account with this id already exists.
    ///
    /// Surfaced by `insert` when two synchronization calls race on the
    /// same external id; the id uniqueness constraint is the enforcement
    /// point.
    #[error("Account already exists: {id}")]
    AlreadyExists { id: String },

    /// Database error.
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates an already exists error.
    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }
}

/// Result type for account store operations.
pub type StoreResult<T> = Result<T, StoreError>;
