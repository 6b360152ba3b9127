//! End-to-end behavior of the deferred mutation buffer: staging, commit
//! ordering, best-effort failure handling, and the authoritative re-fetch.

use async_trait::async_trait;
use atrium_core::{Role, UserRecord};
use atrium_session::notify::MemoryNotifier;
use atrium_session::table::{BufferState, UserTable};
use atrium_store::{MemoryStore, StoreError, UserFields, UserStore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

/// Store wrapper that records every remote call and can be told to fail
/// specific updates or deletes, while delegating to a `MemoryStore`.
struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<String>>,
    fail_updates: RwLock<HashSet<String>>,
    fail_deletes: RwLock<HashSet<String>>,
}

impl RecordingStore {
    fn new(users: Vec<UserRecord>) -> Self {
        Self {
            inner: MemoryStore::with_users(users),
            calls: Mutex::new(Vec::new()),
            fail_updates: RwLock::new(HashSet::new()),
            fail_deletes: RwLock::new(HashSet::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn fail_delete_of(&self, email: &str) {
        self.fail_deletes.write().unwrap().insert(email.to_string());
    }

    fn fail_update_of(&self, email: &str) {
        self.fail_updates.write().unwrap().insert(email.to_string());
    }
}

#[async_trait]
impl UserStore for RecordingStore {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.record("fetch".to_string());
        self.inner.fetch_users().await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        self.inner.get_user(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.inner.find_by_email(email).await
    }

    async fn insert_user(&self, fields: UserFields) -> Result<UserRecord, StoreError> {
        self.inner.insert_user(fields).await
    }

    async fn update_user(&self, id: Uuid, fields: UserFields) -> Result<(), StoreError> {
        self.inner.update_user(id, fields).await
    }

    async fn set_status(&self, email: &str, status: bool) -> Result<(), StoreError> {
        self.record(format!("set_status:{email}:{status}"));
        if self.fail_updates.read().unwrap().contains(email) {
            return Err(StoreError::Backend("injected update failure".to_string()));
        }
        self.inner.set_status(email, status).await
    }

    async fn delete_user(&self, email: &str) -> Result<(), StoreError> {
        self.record(format!("delete:{email}"));
        if self.fail_deletes.read().unwrap().contains(email) {
            return Err(StoreError::Backend("injected delete failure".to_string()));
        }
        self.inner.delete_user(email).await
    }
}

fn record(email: &str, role: Role, status: bool) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        username: Some(email.split('@').next().unwrap().to_string()),
        email: email.to_string(),
        role,
        status,
    }
}

async fn setup(users: Vec<UserRecord>) -> (Arc<RecordingStore>, Arc<MemoryNotifier>, UserTable) {
    let store = Arc::new(RecordingStore::new(users));
    let notifier = Arc::new(MemoryNotifier::new());
    let mut table = UserTable::new(store.clone(), notifier.clone());
    table.refresh().await.unwrap();
    (store, notifier, table)
}

#[tokio::test]
async fn commit_on_clean_buffer_performs_zero_remote_calls() {
    let (store, _notifier, mut table) = setup(vec![record("ann@x.com", Role::User, true)]).await;
    assert_eq!(store.calls(), vec!["fetch"]);

    table.commit().await.unwrap();

    assert_eq!(store.calls(), vec!["fetch"]);
    assert_eq!(table.state(), BufferState::Clean);
    assert_eq!(table.visible().len(), 1);
}

#[tokio::test]
async fn commit_applies_changes_in_staged_order_then_refetches() {
    let (store, _notifier, mut table) = setup(vec![
        record("a@x.com", Role::User, true),
        record("b@x.com", Role::User, false),
        record("c@x.com", Role::User, true),
    ])
    .await;

    table.stage_toggle("b@x.com");
    table.stage_toggle("a@x.com");
    table.stage_delete("c@x.com");
    table.commit().await.unwrap();

    assert_eq!(
        store.calls(),
        vec![
            "fetch",
            "set_status:b@x.com:true",
            "set_status:a@x.com:false",
            "delete:c@x.com",
            "fetch",
        ]
    );
    assert!(table.pending().is_empty());
    assert_eq!(table.state(), BufferState::Clean);

    let visible = table.visible();
    assert_eq!(visible.len(), 2);
    assert!(!visible.iter().find(|r| r.email == "a@x.com").unwrap().status);
    assert!(visible.iter().find(|r| r.email == "b@x.com").unwrap().status);
}

#[tokio::test]
async fn staged_deletion_sends_a_single_delete_and_no_update() {
    let (store, notifier, mut table) = setup(vec![
        record("a@x.com", Role::User, true),
        record("b@x.com", Role::User, false),
    ])
    .await;

    // Toggle then delete the same row: deletion wins, one intent survives.
    table.stage_toggle("a@x.com");
    assert_eq!(table.pending().len(), 1);
    assert_eq!(table.pending()[0].new_status, Some(false));

    table.stage_delete("a@x.com");
    assert_eq!(table.pending().len(), 1);
    assert!(table.pending()[0].is_deletion());
    assert!(table.visible().iter().all(|r| r.email != "a@x.com"));

    table.commit().await.unwrap();

    assert_eq!(store.calls(), vec!["fetch", "delete:a@x.com", "fetch"]);
    assert_eq!(notifier.titles(), vec!["User deleted"]);
    assert!(table.pending().is_empty());
    assert!(table.visible().iter().all(|r| r.email != "a@x.com"));
}

#[tokio::test]
async fn failed_mutation_does_not_block_siblings_or_the_refetch() {
    let (store, notifier, mut table) = setup(vec![
        record("a@x.com", Role::User, true),
        record("b@x.com", Role::User, false),
    ])
    .await;
    store.fail_delete_of("a@x.com");

    table.stage_delete("a@x.com");
    table.stage_toggle("b@x.com");
    table.commit().await.unwrap();

    // Both calls were attempted, in order, and the re-fetch still ran.
    assert_eq!(
        store.calls(),
        vec![
            "fetch",
            "delete:a@x.com",
            "set_status:b@x.com:true",
            "fetch",
        ]
    );
    assert_eq!(notifier.titles(), vec!["Delete failed", "Status updated"]);

    // Projection equals ground truth: the failed delete left a@x.com behind.
    assert!(table.pending().is_empty());
    assert_eq!(table.state(), BufferState::Clean);
    let visible = table.visible();
    assert!(visible.iter().any(|r| r.email == "a@x.com"));
    assert!(visible.iter().find(|r| r.email == "b@x.com").unwrap().status);
}

#[tokio::test]
async fn failed_update_still_yields_clean_buffer_and_fresh_projection() {
    let (store, notifier, mut table) = setup(vec![record("a@x.com", Role::User, true)]).await;
    store.fail_update_of("a@x.com");

    table.stage_toggle("a@x.com");
    table.commit().await.unwrap();

    assert_eq!(notifier.titles(), vec!["Status update failed"]);
    assert!(table.pending().is_empty());
    // The optimistic flip was discarded by the authoritative re-fetch.
    assert!(table.visible()[0].status);
}

#[tokio::test]
async fn commit_reexcludes_rows_promoted_to_the_elevated_role() {
    let (store, _notifier, mut table) = setup(vec![
        record("a@x.com", Role::User, true),
        record("b@x.com", Role::User, true),
    ])
    .await;

    table.stage_toggle("a@x.com");

    // Out-of-band promotion while changes are staged.
    let bo = store.inner.find_by_email("b@x.com").await.unwrap().unwrap();
    store
        .inner
        .update_user(
            bo.id,
            UserFields {
                username: bo.username.clone(),
                email: bo.email.clone(),
                role: Role::SuperAdmin,
                status: bo.status,
            },
        )
        .await
        .unwrap();

    table.commit().await.unwrap();

    let visible = table.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].email, "a@x.com");
}
