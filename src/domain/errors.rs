//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Input failed validation; one entry per offending field.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Duplicate phone numbers are not allowed for the same contact")]
    PhoneDuplicate,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Contact not found")]
    NotFound,

    #[error("Repository error: {0}")]
    Repo(String),
}
