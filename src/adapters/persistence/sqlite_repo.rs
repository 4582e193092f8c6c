//! SQLite-backed repository via libsql. Implements ContactRepoPort.
//!
//! Single `contacts` table; phones are stored as a JSON array of digit strings.
//! Soft delete sets `deleted_at`; email is unique among rows where it is NULL.
//! The database file is data/contacts.db.

use super::now_millis;
use crate::domain::{Address, Contact, ContactFilter, DomainError, NewContact};
use crate::ports::ContactRepoPort;
use chrono::{DateTime, Utc};
use libsql::{Database, params};
use std::path::Path;
use tracing::info;

const CONTACTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    street TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL,
    phones_json TEXT NOT NULL DEFAULT '[]',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    deleted_at INTEGER
)"#;
const EMAIL_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_email_live ON contacts (email) WHERE deleted_at IS NULL";
const NAME_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts (name)";
const CITY_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_contacts_city ON contacts (city)";

const SELECT_COLUMNS: &str =
    "SELECT id, name, street, city, state, email, phones_json, created_at, updated_at FROM contacts";

/// SQLite repository. One database file (contacts.db) in the given base directory.
pub struct SqliteRepo {
    db: Database,
}

impl SqliteRepo {
    /// Connect to (or create) the SQLite database and ensure the schema exists.
    /// Call this once at startup; the returned repo is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Repo(e.to_string()))?;
        let db_path = base.join("contacts.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Repo(e.to_string()))?;

        // PRAGMA returns a row (new value); use query and consume rows (execute fails when rows are returned).
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Repo(format!("WAL pragma failed: {}", e)))?;
        while wal_rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
            .is_some()
        {}

        for ddl in [CONTACTS_TABLE, EMAIL_INDEX, NAME_INDEX, CITY_INDEX] {
            conn.execute(ddl, ())
                .await
                .map_err(|e| DomainError::Repo(e.to_string()))?;
        }

        info!(path = %db_path.display(), "SQLite contact store connected with WAL mode");

        Ok(Self { db })
    }

    fn connection(&self) -> Result<libsql::Connection, DomainError> {
        self.db.connect().map_err(|e| DomainError::Repo(e.to_string()))
    }

    fn phones_to_json(phones: &[String]) -> Result<String, DomainError> {
        serde_json::to_string(phones).map_err(|e| DomainError::Repo(e.to_string()))
    }

    fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, DomainError> {
        DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| DomainError::Repo(format!("invalid timestamp {}", ms)))
    }

    fn row_to_contact(row: &libsql::Row) -> Result<Contact, DomainError> {
        let repo_err = |e: libsql::Error| DomainError::Repo(e.to_string());
        let phones_json: String = row.get(6).map_err(repo_err)?;
        Ok(Contact {
            id: row.get(0).map_err(repo_err)?,
            name: row.get(1).map_err(repo_err)?,
            address: Address {
                street: row.get::<String>(2).unwrap_or_default(),
                city: row.get::<String>(3).unwrap_or_default(),
                state: row.get::<String>(4).unwrap_or_default(),
            },
            email: row.get(5).map_err(repo_err)?,
            phones: serde_json::from_str(&phones_json)
                .map_err(|e| DomainError::Repo(format!("phones_json: {}", e)))?,
            created_at: Self::millis_to_datetime(row.get(7).map_err(repo_err)?)?,
            updated_at: Self::millis_to_datetime(row.get(8).map_err(repo_err)?)?,
        })
    }
}

/// Maps write errors, turning the live-email unique index into `EmailTaken`.
fn write_err(e: libsql::Error) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") {
        DomainError::EmailTaken
    } else {
        DomainError::Repo(msg)
    }
}

#[async_trait::async_trait]
impl ContactRepoPort for SqliteRepo {
    async fn insert(&self, new: NewContact) -> Result<Contact, DomainError> {
        let conn = self.connection()?;
        let now = now_millis();
        let phones_json = Self::phones_to_json(&new.phones)?;
        let mut rows = conn
            .query(
                r#"
                INSERT INTO contacts (name, street, city, state, email, phones_json, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                RETURNING id
                "#,
                params![
                    new.name.as_str(),
                    new.address.street.as_str(),
                    new.address.city.as_str(),
                    new.address.state.as_str(),
                    new.email.as_str(),
                    phones_json,
                    now.timestamp_millis()
                ],
            )
            .await
            .map_err(write_err)?;
        let row = rows
            .next()
            .await
            .map_err(write_err)?
            .ok_or_else(|| DomainError::Repo("insert returned no id".to_string()))?;
        let id: i64 = row.get(0).map_err(|e| DomainError::Repo(e.to_string()))?;

        Ok(Contact {
            id,
            name: new.name,
            address: new.address,
            email: new.email,
            phones: new.phones,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, DomainError> {
        let conn = self.connection()?;
        let sql = format!("{} WHERE deleted_at IS NULL ORDER BY id ASC", SELECT_COLUMNS);
        let mut rows = conn
            .query(&sql, ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        {
            let contact = Self::row_to_contact(&row)?;
            // Matching in Rust keeps case folding Unicode-aware (SQLite LIKE is ASCII-only).
            if filter.matches(&contact) {
                contacts.push(contact);
            }
        }
        Ok(contacts)
    }

    async fn get(&self, id: i64) -> Result<Option<Contact>, DomainError> {
        let conn = self.connection()?;
        let sql = format!("{} WHERE id = ?1 AND deleted_at IS NULL", SELECT_COLUMNS);
        let mut rows = conn
            .query(&sql, params![id])
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_contact(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: i64, new: NewContact) -> Result<Option<Contact>, DomainError> {
        let conn = self.connection()?;
        let phones_json = Self::phones_to_json(&new.phones)?;
        let changed = conn
            .execute(
                r#"
                UPDATE contacts
                SET name = ?1, street = ?2, city = ?3, state = ?4, email = ?5,
                    phones_json = ?6, updated_at = ?7
                WHERE id = ?8 AND deleted_at IS NULL
                "#,
                params![
                    new.name.as_str(),
                    new.address.street.as_str(),
                    new.address.city.as_str(),
                    new.address.state.as_str(),
                    new.email.as_str(),
                    phones_json,
                    now_millis().timestamp_millis(),
                    id
                ],
            )
            .await
            .map_err(write_err)?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DomainError> {
        let conn = self.connection()?;
        let changed = conn
            .execute(
                "UPDATE contacts SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![now_millis().timestamp_millis(), id],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        Ok(changed > 0)
    }
}
