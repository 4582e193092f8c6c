//! Application use cases. Orchestrate domain logic via ports.

pub mod contact_service;
pub mod enrichment;
pub mod weather_cache;

pub use contact_service::ContactService;
pub use enrichment::EnrichmentService;
pub use weather_cache::{CachePolicy, WeatherCache};
