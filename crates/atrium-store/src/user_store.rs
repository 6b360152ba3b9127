//! The user table seam.
//!
//! Everything the session layer needs from the backing store is expressed
//! through [`UserStore`]: a fresh fetch of the full row set, partial updates
//! and deletes keyed by email (the natural key), and the provisioning calls
//! used by the add-user and edit-user flows.

use async_trait::async_trait;
use atrium_core::{Role, UserRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Field set accepted by insert and full-row update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFields {
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
    pub status: bool,
}

/// Async seam to the relational user table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the current full row set, fresh from the store.
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Look up a single user by opaque id.
    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a single user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new user. Fails with [`StoreError::DuplicateEmail`] if the
    /// email is already registered.
    async fn insert_user(&self, fields: UserFields) -> Result<UserRecord, StoreError>;

    /// Replace all editable fields of the user with the given id.
    async fn update_user(&self, id: Uuid, fields: UserFields) -> Result<(), StoreError>;

    /// Set the active flag of the user with the given email.
    async fn set_status(&self, email: &str, status: bool) -> Result<(), StoreError>;

    /// Delete the user with the given email.
    async fn delete_user(&self, email: &str) -> Result<(), StoreError>;
}
