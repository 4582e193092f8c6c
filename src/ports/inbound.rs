//! Inbound port. The HTTP adapter calls into the application through it.

use crate::domain::validation::ContactInput;
use crate::domain::{Contact, ContactFilter, ContactView, DomainError};

/// Contact directory use cases.
#[async_trait::async_trait]
pub trait ContactsPort: Send + Sync {
    /// Validate and store a new contact.
    async fn create(&self, input: ContactInput) -> Result<Contact, DomainError>;

    /// Live contacts matching `filter`, ordered by id, each enriched with weather.
    async fn list(&self, filter: ContactFilter) -> Result<Vec<ContactView>, DomainError>;

    /// One live contact enriched with weather. `NotFound` if missing or deleted.
    async fn get(&self, id: i64) -> Result<ContactView, DomainError>;

    /// Replace every field of a live contact.
    async fn update(&self, id: i64, input: ContactInput) -> Result<Contact, DomainError>;

    /// Soft delete. `NotFound` if already deleted.
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}
