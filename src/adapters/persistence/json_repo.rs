//! Implements ContactRepoPort using a single JSON file.
//!
//! The whole directory is held in memory and rewritten on every change.
//! Soft-deleted contacts stay in the file with `deleted_at` set.

use super::now_millis;
use crate::domain::{Contact, ContactFilter, DomainError, NewContact};
use crate::ports::ContactRepoPort;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredContact {
    #[serde(flatten)]
    contact: Contact,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
}

impl StoredContact {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    next_id: i64,
    contacts: Vec<StoredContact>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            next_id: 1,
            contacts: Vec::new(),
        }
    }
}

impl StoreData {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.contacts
            .iter()
            .filter(|c| c.is_live() && Some(c.contact.id) != except_id)
            .any(|c| c.contact.email == email)
    }

    fn live_mut(&mut self, id: i64) -> Option<&mut StoredContact> {
        self.contacts
            .iter_mut()
            .find(|c| c.is_live() && c.contact.id == id)
    }
}

/// JSON file-based contact storage.
pub struct JsonRepo {
    path: PathBuf,
    data: tokio::sync::RwLock<StoreData>,
}

impl JsonRepo {
    /// Load the file at `path`, or start empty if it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path).await {
            Ok(s) => serde_json::from_str(&s)
                .map_err(|e| DomainError::Repo(format!("parse {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoreData::default(),
            Err(e) => return Err(DomainError::Repo(e.to_string())),
        };
        info!(path = %path.display(), "JSON contact store opened");
        Ok(Self {
            path,
            data: tokio::sync::RwLock::new(data),
        })
    }

    /// Atomic save using write-replace pattern.
    /// 1. Write to temp file
    /// 2. sync_all() to ensure flush to disk
    /// 3. Atomic rename to target path
    async fn persist(&self, data: &StoreData) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| DomainError::Repo(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Repo(format!("create data dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }

    /// Apply `change` to a copy of the data, persist it, then publish it.
    /// The in-memory state is untouched if the write fails.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut guard = self.data.write().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait::async_trait]
impl ContactRepoPort for JsonRepo {
    async fn insert(&self, new: NewContact) -> Result<Contact, DomainError> {
        self.mutate(|data| {
            if data.email_taken(&new.email, None) {
                return Err(DomainError::EmailTaken);
            }
            let now = now_millis();
            let contact = Contact {
                id: data.next_id,
                name: new.name,
                address: new.address,
                email: new.email,
                phones: new.phones,
                created_at: now,
                updated_at: now,
            };
            data.next_id += 1;
            data.contacts.push(StoredContact {
                contact: contact.clone(),
                deleted_at: None,
            });
            Ok(contact)
        })
        .await
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, DomainError> {
        let data = self.data.read().await;
        let mut out: Vec<Contact> = data
            .contacts
            .iter()
            .filter(|c| c.is_live() && filter.matches(&c.contact))
            .map(|c| c.contact.clone())
            .collect();
        out.sort_by_key(|c| c.id);
        Ok(out)
    }

    async fn get(&self, id: i64) -> Result<Option<Contact>, DomainError> {
        let data = self.data.read().await;
        Ok(data
            .contacts
            .iter()
            .find(|c| c.is_live() && c.contact.id == id)
            .map(|c| c.contact.clone()))
    }

    async fn update(&self, id: i64, new: NewContact) -> Result<Option<Contact>, DomainError> {
        self.mutate(|data| {
            if data.live_mut(id).is_none() {
                return Ok(None);
            }
            if data.email_taken(&new.email, Some(id)) {
                return Err(DomainError::EmailTaken);
            }
            let Some(stored) = data.live_mut(id) else {
                return Ok(None);
            };
            let c = &mut stored.contact;
            c.name = new.name;
            c.address = new.address;
            c.email = new.email;
            c.phones = new.phones;
            c.updated_at = now_millis();
            Ok(Some(c.clone()))
        })
        .await
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DomainError> {
        self.mutate(|data| match data.live_mut(id) {
            Some(stored) => {
                stored.deleted_at = Some(now_millis());
                Ok(true)
            }
            None => Ok(false),
        })
        .await
    }
}
