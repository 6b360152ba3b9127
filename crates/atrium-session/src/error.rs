//! Error types for session operations.

use atrium_store::StoreError;
use thiserror::Error;

/// Errors that can occur in session logic.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The row set could not be loaded; the caller keeps its last-known view.
    #[error("failed to load rows: {0}")]
    Load(#[source] StoreError),

    /// A folder move was requested with no events selected.
    #[error("no events selected")]
    EmptySelection,

    /// A user operation was submitted without an email.
    #[error("user email is required")]
    MissingEmail,

    /// Store-level failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
