//! Moving events into a folder.
//!
//! A folder holds its event list as a single ordered array; moving events is
//! read-merge-write: fetch the current list, add the selected events, sort
//! by id, and persist the whole list. Merging is idempotent — an event
//! already filed in the folder is not added twice.

use atrium_core::EventRef;
use atrium_store::FolderStore;
use uuid::Uuid;

use crate::error::SessionError;
use crate::notify::Notifier;

/// Merge the selected events into the folder's event list and persist it.
///
/// Returns the number of events actually added. An empty selection is an
/// error before any remote call is made.
pub async fn move_to_folder(
    store: &dyn FolderStore,
    notifier: &dyn Notifier,
    folder_id: Uuid,
    selected: &[EventRef],
) -> Result<usize, SessionError> {
    if selected.is_empty() {
        return Err(SessionError::EmptySelection);
    }

    let mut merged = store.folder_events(folder_id).await?;
    let mut added = 0;
    for event in selected {
        if !merged.iter().any(|existing| existing.id == event.id) {
            merged.push(event.clone());
            added += 1;
        }
    }
    merged.sort_by(|a, b| a.id.cmp(&b.id));

    if let Err(e) = store.save_folder_events(folder_id, merged).await {
        tracing::error!(folder = %folder_id, error = %e, "folder update failed");
        notifier
            .notify("Error", "Failed to update the folder.")
            .await;
        return Err(e.into());
    }

    notifier
        .notify("Success", "Events have been moved to the selected folder.")
        .await;
    Ok(added)
}
