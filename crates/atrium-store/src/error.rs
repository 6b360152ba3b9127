//! Error types for store backends.

use thiserror::Error;

/// Errors that can occur against the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An insert would violate the email uniqueness invariant.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// The backend failed to execute the call.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Convenience constructor for a missing user keyed by email.
    pub fn user_not_found(email: &str) -> Self {
        StoreError::NotFound(format!("user {email}"))
    }

    /// Convenience constructor for a missing folder.
    pub fn folder_not_found(id: uuid::Uuid) -> Self {
        StoreError::NotFound(format!("folder {id}"))
    }
}
