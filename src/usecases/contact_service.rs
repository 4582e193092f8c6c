//! Contact directory use cases: validation, storage and weather enrichment.
//!
//! Create/update return the stored contact as-is; reads are enriched with
//! weather. Enrichment never turns a successful read into an error.

use crate::domain::validation::{ContactInput, validate_contact};
use crate::domain::{Contact, ContactFilter, ContactView, DomainError};
use crate::ports::{ContactRepoPort, ContactsPort};
use crate::usecases::enrichment::EnrichmentService;
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

pub struct ContactService {
    repo: Arc<dyn ContactRepoPort>,
    enrichment: Arc<EnrichmentService>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepoPort>, enrichment: Arc<EnrichmentService>) -> Self {
        Self { repo, enrichment }
    }

    async fn view(&self, contact: Contact) -> ContactView {
        let enrichment = self.enrichment.enrich_address(&contact.address).await;
        ContactView::new(contact, enrichment)
    }
}

#[async_trait::async_trait]
impl ContactsPort for ContactService {
    async fn create(&self, input: ContactInput) -> Result<Contact, DomainError> {
        let new_contact = validate_contact(&input)?;
        let contact = self.repo.insert(new_contact).await?;
        info!(id = contact.id, "contact created");
        Ok(contact)
    }

    async fn list(&self, filter: ContactFilter) -> Result<Vec<ContactView>, DomainError> {
        let contacts = self.repo.list(&filter).await?;
        // join_all keeps input order, so the listing order survives.
        Ok(join_all(contacts.into_iter().map(|c| self.view(c))).await)
    }

    async fn get(&self, id: i64) -> Result<ContactView, DomainError> {
        let contact = self.repo.get(id).await?.ok_or(DomainError::NotFound)?;
        Ok(self.view(contact).await)
    }

    async fn update(&self, id: i64, input: ContactInput) -> Result<Contact, DomainError> {
        let new_contact = validate_contact(&input)?;
        let contact = self
            .repo
            .update(id, new_contact)
            .await?
            .ok_or(DomainError::NotFound)?;
        info!(id, "contact updated");
        Ok(contact)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.soft_delete(id).await? {
            return Err(DomainError::NotFound);
        }
        info!(id, "contact soft-deleted");
        Ok(())
    }
}
