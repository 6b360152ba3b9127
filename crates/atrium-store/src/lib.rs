//! Store seams for Atrium.
//!
//! The session layer never talks to a backend directly; it goes through the
//! [`UserStore`] and [`FolderStore`] traits defined here. [`MemoryStore`]
//! is the reference backend used by tests and development; the Postgres
//! backend lives in the `atrium-adapter-pg` crate.

pub mod error;
pub mod folder_store;
pub mod memory;
pub mod user_store;

pub use error::StoreError;
pub use folder_store::FolderStore;
pub use memory::MemoryStore;
pub use user_store::{UserFields, UserStore};
