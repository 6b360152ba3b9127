//! User provisioning flows: add a user, edit a user's details.
//!
//! Thin validated wrappers around the store calls, each emitting the toast
//! the corresponding form shows on success.

use atrium_core::UserRecord;
use atrium_store::{UserFields, UserStore};
use chrono::Utc;
use uuid::Uuid;

use crate::error::SessionError;
use crate::notify::Notifier;

/// Insert a new user and notify on success.
pub async fn add_user(
    store: &dyn UserStore,
    notifier: &dyn Notifier,
    fields: UserFields,
) -> Result<UserRecord, SessionError> {
    if fields.email.trim().is_empty() {
        return Err(SessionError::MissingEmail);
    }

    match store.insert_user(fields).await {
        Ok(record) => {
            notifier
                .notify(
                    "User added successfully",
                    &format!("Created at {}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
                )
                .await;
            Ok(record)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to add user");
            Err(e.into())
        }
    }
}

/// Replace all editable fields of an existing user and notify on success.
pub async fn update_details(
    store: &dyn UserStore,
    notifier: &dyn Notifier,
    id: Uuid,
    fields: UserFields,
) -> Result<(), SessionError> {
    if fields.email.trim().is_empty() {
        return Err(SessionError::MissingEmail);
    }

    match store.update_user(id, fields).await {
        Ok(()) => {
            notifier
                .notify(
                    "User updated successfully",
                    &format!("Updated at {}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
                )
                .await;
            Ok(())
        }
        Err(e) => {
            tracing::error!(user = %id, error = %e, "failed to update user");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;
    use atrium_core::Role;
    use atrium_store::{MemoryStore, StoreError};

    fn fields(email: &str) -> UserFields {
        UserFields {
            username: Some("Ann".to_string()),
            email: email.to_string(),
            role: Role::User,
            status: true,
        }
    }

    #[tokio::test]
    async fn test_add_user_notifies_and_persists() {
        let store = MemoryStore::new();
        let notifier = MemoryNotifier::new();

        let record = add_user(&store, &notifier, fields("ann@x.com"))
            .await
            .unwrap();
        assert_eq!(record.email, "ann@x.com");
        assert_eq!(notifier.titles(), vec!["User added successfully"]);
        assert!(store.find_by_email("ann@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_user_requires_email() {
        let store = MemoryStore::new();
        let notifier = MemoryNotifier::new();

        let err = add_user(&store, &notifier, fields("  ")).await.unwrap_err();
        assert!(matches!(err, SessionError::MissingEmail));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_add_user_surfaces_duplicate_email() {
        let store = MemoryStore::new();
        let notifier = MemoryNotifier::new();

        add_user(&store, &notifier, fields("ann@x.com")).await.unwrap();
        let err = add_user(&store, &notifier, fields("ann@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Store(StoreError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_update_details_replaces_fields() {
        let store = MemoryStore::new();
        let notifier = MemoryNotifier::new();
        let record = add_user(&store, &notifier, fields("ann@x.com"))
            .await
            .unwrap();

        update_details(
            &store,
            &notifier,
            record.id,
            UserFields {
                username: Some("Annie".to_string()),
                email: "annie@x.com".to_string(),
                role: Role::Admin,
                status: false,
            },
        )
        .await
        .unwrap();

        let updated = store.get_user(record.id).await.unwrap().unwrap();
        assert_eq!(updated.username.as_deref(), Some("Annie"));
        assert_eq!(updated.email, "annie@x.com");
        assert_eq!(updated.role, Role::Admin);
        assert!(!updated.status);
    }
}
