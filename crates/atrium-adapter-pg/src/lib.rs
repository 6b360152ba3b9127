//! Postgres implementation of the Atrium store seams.
//!
//! Expects two tables:
//!
//! - `users(id uuid primary key, username text, email text unique not null,
//!   access text not null, status boolean not null)`
//! - `event_folders(id uuid primary key, title text not null,
//!   created_by text not null, events jsonb not null default '[]')`
//!
//! The `events` column holds the folder's ordered event-reference list as a
//! JSON array of `{id, title}` objects.

use async_trait::async_trait;
use atrium_core::{EventRef, Role, UserRecord};
use atrium_store::{FolderStore, StoreError, UserFields, UserStore};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

/// Store backend over a Postgres connection pool.
pub struct PostgresStore {
    pool: sqlx::PgPool,
}

impl PostgresStore {
    /// Connect to the given database URL with a small pool.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn with_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn backend_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn row_to_user(row: &PgRow) -> Result<UserRecord, StoreError> {
    let access: String = row.try_get("access").map_err(backend_err)?;
    let role = access
        .parse::<Role>()
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(UserRecord {
        id: row.try_get("id").map_err(backend_err)?,
        username: row.try_get("username").map_err(backend_err)?,
        email: row.try_get("email").map_err(backend_err)?,
        role,
        status: row.try_get("status").map_err(backend_err)?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query("SELECT id, username, email, access, status FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(backend_err)?;
        rows.iter().map(row_to_user).collect()
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT id, username, email, access, status FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_err)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row =
            sqlx::query("SELECT id, username, email, access, status FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend_err)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn insert_user(&self, fields: UserFields) -> Result<UserRecord, StoreError> {
        let id = Uuid::new_v4();
        let result = sqlx::query(
            "INSERT INTO users (id, username, email, access, status) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&fields.username)
        .bind(&fields.email)
        .bind(fields.role.as_str())
        .bind(fields.status)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(UserRecord {
                id,
                username: fields.username,
                email: fields.email,
                role: fields.role,
                status: fields.status,
            }),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail(fields.email)),
            Err(e) => Err(backend_err(e)),
        }
    }

    async fn update_user(&self, id: Uuid, fields: UserFields) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, email = $3, access = $4, status = $5 WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.username)
        .bind(&fields.email)
        .bind(fields.role.as_str())
        .bind(fields.status)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(StoreError::NotFound(format!("user {id}")))
            }
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail(fields.email)),
            Err(e) => Err(backend_err(e)),
        }
    }

    async fn set_status(&self, email: &str, status: bool) -> Result<(), StoreError> {
        let done = sqlx::query("UPDATE users SET status = $2 WHERE email = $1")
            .bind(email)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(backend_err)?;
        if done.rows_affected() == 0 {
            return Err(StoreError::user_not_found(email));
        }
        Ok(())
    }

    async fn delete_user(&self, email: &str) -> Result<(), StoreError> {
        let done = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(backend_err)?;
        if done.rows_affected() == 0 {
            return Err(StoreError::user_not_found(email));
        }
        Ok(())
    }
}

fn row_to_folder(row: &PgRow) -> Result<atrium_core::Folder, StoreError> {
    let events: serde_json::Value = row.try_get("events").map_err(backend_err)?;
    let events: Vec<EventRef> = serde_json::from_value(events)
        .map_err(|e| StoreError::Backend(format!("malformed events column: {e}")))?;
    Ok(atrium_core::Folder {
        id: row.try_get("id").map_err(backend_err)?,
        title: row.try_get("title").map_err(backend_err)?,
        created_by: row.try_get("created_by").map_err(backend_err)?,
        events,
    })
}

#[async_trait]
impl FolderStore for PostgresStore {
    async fn list_folders(&self, created_by: &str) -> Result<Vec<atrium_core::Folder>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, created_by, events FROM event_folders WHERE created_by = $1 ORDER BY title",
        )
        .bind(created_by)
        .fetch_all(&self.pool)
        .await
        .map_err(backend_err)?;
        rows.iter().map(row_to_folder).collect()
    }

    async fn folder_events(&self, id: Uuid) -> Result<Vec<EventRef>, StoreError> {
        let row = sqlx::query("SELECT events FROM event_folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_err)?
            .ok_or_else(|| StoreError::folder_not_found(id))?;
        let events: serde_json::Value = row.try_get("events").map_err(backend_err)?;
        serde_json::from_value(events)
            .map_err(|e| StoreError::Backend(format!("malformed events column: {e}")))
    }

    async fn save_folder_events(&self, id: Uuid, events: Vec<EventRef>) -> Result<(), StoreError> {
        let payload = serde_json::to_value(&events)
            .map_err(|e| StoreError::Backend(format!("events not serializable: {e}")))?;
        let done = sqlx::query("UPDATE event_folders SET events = $2 WHERE id = $1")
            .bind(id)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(backend_err)?;
        if done.rows_affected() == 0 {
            return Err(StoreError::folder_not_found(id));
        }
        tracing::debug!(folder = %id, count = events.len(), "folder events saved");
        Ok(())
    }
}
