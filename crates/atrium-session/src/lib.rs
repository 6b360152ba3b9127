//! Session logic for the Atrium administration views.
//!
//! The centerpiece is [`UserTable`], a deferred mutation buffer: row-level
//! changes (status toggles, deletions) are staged against an in-memory
//! projection and flushed as one user-initiated batch of independent remote
//! calls, after which the projection is re-fetched from the store. Around it
//! sit the one-shot [`AccessGate`], the folder-move merge, and the user
//! provisioning flows, all talking to the outside world through the
//! `atrium-store` seams and the [`Notifier`] toast seam.

pub mod error;
pub mod folders;
pub mod gate;
pub mod notify;
pub mod table;
pub mod users;

pub use error::SessionError;
pub use folders::move_to_folder;
pub use gate::AccessGate;
pub use notify::{MemoryNotifier, Notifier, NullNotifier, TraceNotifier};
pub use table::{
    BufferState, PendingChange, SortConfig, SortDirection, SortKey, UserRow, UserTable,
};
pub use users::{add_user, update_details};
