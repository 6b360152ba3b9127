use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// Configuration types shared across all Atrium crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{AtriumConfig, ConfigError, NotifyConfig, UpstreamConfig};

/// Access role of a user account.
///
/// The elevated role ("super admin") gates entry to the administration views
/// and is excluded from the managed user table entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Ordinary account.
    #[serde(rename = "user")]
    User,
    /// Administrative account without full control.
    #[serde(rename = "admin")]
    Admin,
    /// Elevated account with full control over the dashboard.
    #[serde(rename = "super admin")]
    SuperAdmin,
}

impl Role {
    /// Whether this role is the elevated one.
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Stable string form, matching the stored column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "super admin" => Ok(Role::SuperAdmin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// One user account as held by the backing store.
///
/// Email is the natural key used for mutation targeting; `id` is the opaque
/// identifier, stable across fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    /// Display name; may be absent, in which case views fall back to a
    /// positional placeholder.
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
    /// Active flag. Inactive accounts stay listed but are rendered muted.
    pub status: bool,
}

/// Reference to an event as stored inside a folder's event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub id: Uuid,
    pub title: String,
}

/// A folder grouping events, owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub title: String,
    /// Email of the owning user.
    pub created_by: String,
    /// Ordered event references filed into this folder.
    #[serde(default)]
    pub events: Vec<EventRef>,
}
