//! Weather lookup results and the views attached to enriched contacts.

use serde::Serialize;
use thiserror::Error;

/// Normalized current conditions for a city, as returned by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City display name as resolved by the provider (may be empty).
    pub city_name: String,
    pub temperature_c: f64,
    /// Short machine-readable token, e.g. `clear_day`, `rain`.
    pub condition_code: String,
    /// Free text in the provider's configured locale.
    pub description: String,
}

/// Why a weather lookup produced no report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherFailure {
    #[error("weather provider unavailable")]
    ProviderUnavailable,

    #[error("weather provider returned a malformed response")]
    BadResponse,

    #[error("weather API key is not configured")]
    ConfigMissing,
}

/// Outcome of a single lookup. Cached as-is, including failures.
pub type WeatherResult = Result<WeatherReport, WeatherFailure>;

/// Unit separator; never part of a legal city or state name.
const KEY_SEPARATOR: char = '\u{1f}';

/// Cache key for a city/state pair. Case and surrounding whitespace are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(city: &str, state: &str) -> Self {
        let mut key = city.trim().to_lowercase();
        key.push(KEY_SEPARATOR);
        key.push_str(&state.trim().to_uppercase());
        Self(key)
    }
}

/// Weather block of an enriched contact view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub city: String,
    pub temperature_c: f64,
    pub condition_code: String,
    pub description: String,
}

/// The two fields every enriched contact view gains.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub weather: Option<WeatherView>,
    pub suggestion: String,
}
