//! Entry capability check for the administration views.
//!
//! The check runs once at view entry and is exposed as a plain boolean, so
//! the rest of the session code never re-derives access from scattered role
//! conditionals.

use atrium_store::UserStore;

use crate::error::SessionError;
use crate::notify::Notifier;

/// Result of the one-shot access check.
pub struct AccessGate {
    admitted: bool,
}

impl AccessGate {
    /// Look up the session user by email and admit only the elevated role.
    ///
    /// A restricted (or unknown) user gets an "Access Restricted"
    /// notification and a closed gate.
    pub async fn check(
        store: &dyn UserStore,
        notifier: &dyn Notifier,
        email: &str,
    ) -> Result<Self, SessionError> {
        let user = store.find_by_email(email).await?;
        let admitted = user.is_some_and(|u| u.role.is_elevated());

        if !admitted {
            tracing::warn!(email, "dashboard access denied");
            notifier
                .notify(
                    "Access Restricted",
                    "You have no access to the application.",
                )
                .await;
        }

        Ok(Self { admitted })
    }

    /// Whether the session user may use the administration views.
    pub fn admitted(&self) -> bool {
        self.admitted
    }
}
