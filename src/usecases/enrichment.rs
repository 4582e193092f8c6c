//! Weather enrichment for a contact's address.
//!
//! Never fails: a missing city or any lookup failure degrades to no weather
//! plus an explanatory suggestion.

use crate::domain::{Address, Enrichment, WeatherView, suggest};
use crate::usecases::weather_cache::WeatherCache;
use std::sync::Arc;
use tracing::warn;

pub const NO_CITY_MESSAGE: &str = "No city configured for this contact; weather was not looked up.";
pub const UNAVAILABLE_MESSAGE: &str = "Weather currently unavailable; try again later.";

pub struct EnrichmentService {
    cache: Arc<WeatherCache>,
}

impl EnrichmentService {
    pub fn new(cache: Arc<WeatherCache>) -> Self {
        Self { cache }
    }

    pub async fn enrich_address(&self, address: &Address) -> Enrichment {
        self.enrich(Some(&address.city), Some(&address.state)).await
    }

    /// Weather and suggestion for a city. The cache is not consulted when the
    /// city is absent or blank.
    pub async fn enrich(&self, city: Option<&str>, state: Option<&str>) -> Enrichment {
        let city = match city.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => {
                return Enrichment {
                    weather: None,
                    suggestion: NO_CITY_MESSAGE.to_string(),
                };
            }
        };
        let state = state.unwrap_or_default();

        match self.cache.lookup(city, state).await {
            Ok(report) => {
                let suggestion = suggest(
                    report.temperature_c,
                    &report.condition_code,
                    &report.description,
                );
                let resolved = if report.city_name.trim().is_empty() {
                    city.to_string()
                } else {
                    report.city_name
                };
                Enrichment {
                    weather: Some(WeatherView {
                        city: resolved,
                        temperature_c: report.temperature_c,
                        condition_code: report.condition_code,
                        description: report.description,
                    }),
                    suggestion: suggestion.message().to_string(),
                }
            }
            Err(reason) => {
                warn!(city, state, reason = %reason, "weather enrichment unavailable");
                Enrichment {
                    weather: None,
                    suggestion: UNAVAILABLE_MESSAGE.to_string(),
                }
            }
        }
    }
}
