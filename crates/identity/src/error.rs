//! Identity domain error types.

use thiserror::Error;

/// Errors that can occur when constructing or mutating domain objects.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A value object rejected its input.
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
}

impl IdentityError {
    /// Creates a validation error for the given field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for identity domain operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
