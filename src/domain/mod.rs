//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod phone;
pub mod suggestion;
pub mod validation;
pub mod weather;

pub use entities::{Address, Contact, ContactFilter, ContactView, NewContact};
pub use errors::DomainError;
pub use phone::normalize_phone;
pub use suggestion::{Suggestion, suggest};
pub use weather::{CacheKey, Enrichment, WeatherFailure, WeatherReport, WeatherResult, WeatherView};
