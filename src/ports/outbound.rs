//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Contact, ContactFilter, DomainError, NewContact, WeatherResult};

/// Current-weather lookup for a city/state pair.
///
/// Implementations never fail past this boundary: transport errors, bad
/// payloads and missing credentials all come back as `Err(WeatherFailure)`.
#[async_trait::async_trait]
pub trait WeatherPort: Send + Sync {
    async fn fetch(&self, city: &str, state: &str) -> WeatherResult;
}

/// Contact storage. Soft-deleted contacts are invisible to every method.
#[async_trait::async_trait]
pub trait ContactRepoPort: Send + Sync {
    /// Store a new contact. `EmailTaken` if a live contact has the same email.
    async fn insert(&self, contact: NewContact) -> Result<Contact, DomainError>;

    /// Live contacts matching `filter`, ordered by id ascending.
    async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, DomainError>;

    async fn get(&self, id: i64) -> Result<Option<Contact>, DomainError>;

    /// Replace all fields. Returns `None` if no live contact has this id.
    async fn update(&self, id: i64, contact: NewContact) -> Result<Option<Contact>, DomainError>;

    /// Mark as deleted. Returns false if no live contact has this id.
    async fn soft_delete(&self, id: i64) -> Result<bool, DomainError>;
}

/// Wall clock in milliseconds since the Unix epoch. Injected so cache expiry
/// can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}
