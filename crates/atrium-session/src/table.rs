//! The deferred mutation buffer behind the user management table.
//!
//! [`UserTable`] holds the last fetched row set plus an ordered list of
//! staged, uncommitted changes. The visible projection is a pure function of
//! (base rows, pending overlay, search term, sort config), recomputed on
//! every read rather than patched in place. Staging touches only local
//! state; `commit` applies the staged changes as a sequence of independent
//! remote calls and then replaces the projection with a fresh fetch.
//!
//! Rows with the elevated role are excluded from the projection at fetch
//! time and are never eligible for staging.

use atrium_core::{Role, UserRecord};
use atrium_store::UserStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::SessionError;
use crate::notify::Notifier;

/// One row of the user table as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: bool,
}

/// One staged, uncommitted change, keyed by the target row's email.
///
/// `new_status: Some(_)` records a status-change intent; `None` records a
/// deletion intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub email: String,
    pub new_status: Option<bool>,
}

impl PendingChange {
    pub fn is_deletion(&self) -> bool {
        self.new_status.is_none()
    }
}

/// Buffer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No staged changes.
    Clean,
    /// One or more staged changes awaiting commit.
    Dirty,
    /// A commit is applying the staged changes.
    Committing,
}

/// Sortable columns of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Email,
    Role,
    Status,
}

/// Sort direction; repeated sorts on the same column toggle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Deferred mutation buffer over the user table.
pub struct UserTable {
    store: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    /// Rows from the last successful fetch, elevated roles excluded.
    rows: Vec<UserRow>,
    /// Staged changes in the order they were staged; at most one per email.
    pending: Vec<PendingChange>,
    search: String,
    sort: Option<SortConfig>,
    state: BufferState,
}

/// Convert fetched records into display rows.
///
/// Elevated rows are dropped; records with no username get a positional
/// `User{n}` placeholder for display.
fn project(records: Vec<UserRecord>) -> Vec<UserRow> {
    records
        .into_iter()
        .filter(|record| !record.role.is_elevated())
        .enumerate()
        .map(|(index, record)| UserRow {
            id: record.id,
            name: record
                .username
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("User{}", index + 1)),
            email: record.email,
            role: record.role,
            status: record.status,
        })
        .collect()
}

impl UserTable {
    /// Create an empty table. Call [`UserTable::refresh`] to populate it.
    pub fn new(store: Arc<dyn UserStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            rows: Vec::new(),
            pending: Vec::new(),
            search: String::new(),
            sort: None,
            state: BufferState::Clean,
        }
    }

    /// Current buffer state.
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Staged changes, in staging order.
    pub fn pending(&self) -> &[PendingChange] {
        &self.pending
    }

    /// Re-fetch the base rows from the store.
    ///
    /// On failure the last-known rows are kept (stale but visible) and the
    /// error is logged and returned. Staged changes are untouched either way.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        match self.store.fetch_users().await {
            Ok(records) => {
                self.rows = project(records);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch users, keeping last-known rows");
                Err(SessionError::Load(e))
            }
        }
    }

    /// Base rows with the pending overlay applied, unfiltered and unsorted.
    fn overlaid(&self) -> Vec<UserRow> {
        let mut rows = self.rows.clone();
        for change in &self.pending {
            match change.new_status {
                Some(status) => {
                    if let Some(row) = rows.iter_mut().find(|r| r.email == change.email) {
                        row.status = status;
                    }
                }
                None => rows.retain(|r| r.email != change.email),
            }
        }
        rows
    }

    /// The visible projection: overlay, then search filter, then sort.
    pub fn visible(&self) -> Vec<UserRow> {
        let term = self.search.to_lowercase();
        let mut rows: Vec<UserRow> = self
            .overlaid()
            .into_iter()
            .filter(|row| {
                term.is_empty()
                    || row.name.to_lowercase().contains(&term)
                    || row.email.to_lowercase().contains(&term)
            })
            .collect();

        if let Some(sort) = self.sort {
            // Vec::sort_by is stable, so equal keys keep their relative order.
            rows.sort_by(|a, b| {
                let ord = match sort.key {
                    SortKey::Name => a.name.cmp(&b.name),
                    SortKey::Email => a.email.cmp(&b.email),
                    SortKey::Role => a.role.as_str().cmp(b.role.as_str()),
                    SortKey::Status => a.status.cmp(&b.status),
                };
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    /// Set the case-insensitive search term over name and email.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Current sort configuration, if any.
    pub fn sort(&self) -> Option<SortConfig> {
        self.sort
    }

    /// Sort by a column; sorting the same column again toggles the direction.
    pub fn sort_by(&mut self, key: SortKey) {
        let direction = match self.sort {
            Some(cfg) if cfg.key == key && cfg.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortConfig { key, direction });
    }

    /// Stage a status flip for the row with the given email.
    ///
    /// No remote call is made. A second toggle for the same email overwrites
    /// the staged status rather than adding a second entry. Unknown emails
    /// and elevated rows are rejected silently.
    pub fn stage_toggle(&mut self, email: &str) {
        let Some(row) = self.overlaid().into_iter().find(|r| r.email == email) else {
            return;
        };
        if row.role.is_elevated() {
            return;
        }
        let new_status = !row.status;

        if let Some(change) = self.pending.iter_mut().find(|c| c.email == email) {
            change.new_status = Some(new_status);
        } else {
            self.pending.push(PendingChange {
                email: email.to_string(),
                new_status: Some(new_status),
            });
        }
        self.state = BufferState::Dirty;
    }

    /// Stage a deletion for the row with the given email.
    ///
    /// The row disappears from the projection immediately. A staged deletion
    /// replaces any staged status change for the same email, so the buffer
    /// keeps at most one entry per email and commit sends a single delete.
    pub fn stage_delete(&mut self, email: &str) {
        let Some(row) = self.overlaid().into_iter().find(|r| r.email == email) else {
            return;
        };
        if row.role.is_elevated() {
            return;
        }

        self.pending.retain(|c| c.email != email);
        self.pending.push(PendingChange {
            email: email.to_string(),
            new_status: None,
        });
        self.state = BufferState::Dirty;
    }

    /// Apply every staged change as an independent remote call, in staging
    /// order, then replace the projection with a fresh fetch.
    ///
    /// A failed call is logged and notified but does not stop the remaining
    /// calls or the terminal re-fetch (best-effort, not transactional). If
    /// the re-fetch itself fails, the overlaid rows become the new base so
    /// the view does not snap back. The buffer always ends `Clean` and empty.
    pub async fn commit(&mut self) -> Result<(), SessionError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.state = BufferState::Committing;

        let fallback = self.overlaid();
        let staged = std::mem::take(&mut self.pending);

        for change in &staged {
            match change.new_status {
                Some(status) => match self.store.set_status(&change.email, status).await {
                    Ok(()) => {
                        self.notifier
                            .notify(
                                "Status updated",
                                &format!(
                                    "{} set to {} at {}",
                                    change.email,
                                    if status { "active" } else { "inactive" },
                                    Utc::now().format("%Y-%m-%d %H:%M:%S")
                                ),
                            )
                            .await;
                    }
                    Err(e) => {
                        tracing::error!(email = %change.email, error = %e, "status update failed");
                        self.notifier
                            .notify(
                                "Status update failed",
                                &format!("{} could not be updated", change.email),
                            )
                            .await;
                    }
                },
                None => match self.store.delete_user(&change.email).await {
                    Ok(()) => {
                        self.notifier
                            .notify(
                                "User deleted",
                                &format!(
                                    "{} deleted at {}",
                                    change.email,
                                    Utc::now().format("%Y-%m-%d %H:%M:%S")
                                ),
                            )
                            .await;
                    }
                    Err(e) => {
                        tracing::error!(email = %change.email, error = %e, "delete failed");
                        self.notifier
                            .notify(
                                "Delete failed",
                                &format!("{} could not be deleted", change.email),
                            )
                            .await;
                    }
                },
            }
        }

        // Authoritative re-sync: optimistic state is discarded in favor of
        // whatever the store now holds, elevated rows re-excluded.
        match self.store.fetch_users().await {
            Ok(records) => self.rows = project(records),
            Err(e) => {
                tracing::error!(error = %e, "re-fetch after commit failed, keeping optimistic rows");
                self.rows = fallback;
            }
        }

        self.state = BufferState::Clean;
        Ok(())
    }

    /// Drop all staged changes without applying them and reload ground truth.
    pub async fn discard(&mut self) -> Result<(), SessionError> {
        self.pending.clear();
        self.state = BufferState::Clean;
        self.refresh().await
    }
}
