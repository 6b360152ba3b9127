//! In-memory store backend.
//!
//! Used by tests and local development. Enforces the same email uniqueness
//! invariant as the relational backend.

use async_trait::async_trait;
use atrium_core::{EventRef, Folder, UserRecord};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::folder_store::FolderStore;
use crate::user_store::{UserFields, UserStore};

/// In-memory implementation of [`UserStore`] and [`FolderStore`].
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserRecord>>,
    folders: RwLock<Vec<Folder>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with users.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: RwLock::new(users),
            folders: RwLock::new(Vec::new()),
        }
    }

    /// Seed a folder.
    pub fn add_folder(&self, folder: Folder) -> Result<(), StoreError> {
        let mut folders = self.write_folders()?;
        folders.push(folder);
        Ok(())
    }

    fn read_users(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<UserRecord>>, StoreError> {
        self.users
            .read()
            .map_err(|e| StoreError::Backend(format!("user lock poisoned: {e}")))
    }

    fn write_users(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<UserRecord>>, StoreError> {
        self.users
            .write()
            .map_err(|e| StoreError::Backend(format!("user lock poisoned: {e}")))
    }

    fn read_folders(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Folder>>, StoreError> {
        self.folders
            .read()
            .map_err(|e| StoreError::Backend(format!("folder lock poisoned: {e}")))
    }

    fn write_folders(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Folder>>, StoreError> {
        self.folders
            .write()
            .map_err(|e| StoreError::Backend(format!("folder lock poisoned: {e}")))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.read_users()?.clone())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.read_users()?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .read_users()?
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, fields: UserFields) -> Result<UserRecord, StoreError> {
        let mut users = self.write_users()?;
        if users.iter().any(|u| u.email == fields.email) {
            return Err(StoreError::DuplicateEmail(fields.email));
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: fields.username,
            email: fields.email,
            role: fields.role,
            status: fields.status,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: Uuid, fields: UserFields) -> Result<(), StoreError> {
        let mut users = self.write_users()?;
        if users
            .iter()
            .any(|u| u.id != id && u.email == fields.email)
        {
            return Err(StoreError::DuplicateEmail(fields.email));
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        user.username = fields.username;
        user.email = fields.email;
        user.role = fields.role;
        user.status = fields.status;
        Ok(())
    }

    async fn set_status(&self, email: &str, status: bool) -> Result<(), StoreError> {
        let mut users = self.write_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| StoreError::user_not_found(email))?;
        user.status = status;
        Ok(())
    }

    async fn delete_user(&self, email: &str) -> Result<(), StoreError> {
        let mut users = self.write_users()?;
        let before = users.len();
        users.retain(|u| u.email != email);
        if users.len() == before {
            return Err(StoreError::user_not_found(email));
        }
        Ok(())
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn list_folders(&self, created_by: &str) -> Result<Vec<Folder>, StoreError> {
        Ok(self
            .read_folders()?
            .iter()
            .filter(|f| f.created_by == created_by)
            .cloned()
            .collect())
    }

    async fn folder_events(&self, id: Uuid) -> Result<Vec<EventRef>, StoreError> {
        self.read_folders()?
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.events.clone())
            .ok_or_else(|| StoreError::folder_not_found(id))
    }

    async fn save_folder_events(&self, id: Uuid, events: Vec<EventRef>) -> Result<(), StoreError> {
        let mut folders = self.write_folders()?;
        let folder = folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::folder_not_found(id))?;
        folder.events = events;
        Ok(())
    }
}
