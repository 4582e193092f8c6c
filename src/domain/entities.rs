//! Domain entities. Pure data structures for the core business.
//!
//! No storage/HTTP types here; adapters map to and from these.

use super::phone::normalize_phone;
use super::weather::{Enrichment, WeatherView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    /// May be empty in legacy records; enrichment is skipped then.
    #[serde(default)]
    pub city: String,
    /// Two-letter state code, uppercase, or empty.
    #[serde(default)]
    pub state: String,
}

/// A stored, live contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub address: Address,
    pub email: String,
    /// Digits only, unique within the contact.
    pub phones: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated and normalized contact fields, ready to be stored.
/// Produced by `validation::validate_contact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub address: Address,
    pub email: String,
    pub phones: Vec<String>,
}

/// Contact plus weather enrichment, as returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: Contact,
    pub weather: Option<WeatherView>,
    pub suggestion: String,
}

impl ContactView {
    pub fn new(contact: Contact, enrichment: Enrichment) -> Self {
        Self {
            contact,
            weather: enrichment.weather,
            suggestion: enrichment.suggestion,
        }
    }
}

/// Search criteria for listing. Every field is an optional case-insensitive
/// substring match; empty strings are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub name: Option<String>,
    /// Matches street, city or state.
    pub address: Option<String>,
    pub email: Option<String>,
    /// Normalized to digits before matching against stored phones.
    pub phone: Option<String>,
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        if let Some(q) = non_empty(&self.name) {
            if !contains_ci(&contact.name, q) {
                return false;
            }
        }
        if let Some(q) = non_empty(&self.email) {
            if !contains_ci(&contact.email, q) {
                return false;
            }
        }
        if let Some(q) = non_empty(&self.address) {
            let a = &contact.address;
            if !(contains_ci(&a.street, q) || contains_ci(&a.city, q) || contains_ci(&a.state, q)) {
                return false;
            }
        }
        if let Some(q) = non_empty(&self.phone) {
            let digits = normalize_phone(q);
            if !contact.phones.iter().any(|p| p.contains(&digits)) {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
