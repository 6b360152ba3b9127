//! The event-folder seam.

use async_trait::async_trait;
use atrium_core::{EventRef, Folder};
use uuid::Uuid;

use crate::error::StoreError;

/// Async seam to the folder table.
///
/// Folders hold an ordered list of event references; the session layer reads
/// the current list, merges, and writes the whole list back.
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// List the folders owned by the given email.
    async fn list_folders(&self, created_by: &str) -> Result<Vec<Folder>, StoreError>;

    /// Read the current event list of a folder.
    async fn folder_events(&self, id: Uuid) -> Result<Vec<EventRef>, StoreError>;

    /// Replace the event list of a folder.
    async fn save_folder_events(&self, id: Uuid, events: Vec<EventRef>) -> Result<(), StoreError>;
}
