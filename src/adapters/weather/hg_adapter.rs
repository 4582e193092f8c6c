//! HG Weather adapter (api.hgbrasil.com).
//!
//! Implements `WeatherPort` with one GET per lookup, a bounded timeout and a
//! strict response shape. Every failure is mapped to a `WeatherFailure`; no
//! retries happen here.

use crate::domain::{WeatherFailure, WeatherReport, WeatherResult};
use crate::ports::WeatherPort;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_API_URL: &str = "https://api.hgbrasil.com/weather";
pub const DEFAULT_LOCALE: &str = "pt";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for `HgWeatherAdapter`.
#[derive(Debug, Clone)]
pub struct HgWeatherSettings {
    pub api_url: String,
    /// Absent or blank means every lookup fails with `ConfigMissing`.
    pub api_key: Option<String>,
    /// Language of the `description` field, e.g. "pt" or "en".
    pub locale: String,
    pub timeout: Duration,
}

impl Default for HgWeatherSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            locale: DEFAULT_LOCALE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct HgWeatherAdapter {
    client: reqwest::Client,
    settings: HgWeatherSettings,
}

impl HgWeatherAdapter {
    pub fn new(settings: HgWeatherSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// `city,STATE`, or just the city when no state is known.
    fn city_param(city: &str, state: &str) -> String {
        if state.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, state)
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Decode the body into a report. Anything outside the expected shape is
    /// a `BadResponse`.
    fn parse_body(body: &str) -> WeatherResult {
        let parsed: HgResponse = serde_json::from_str(body).map_err(|e| {
            warn!(error = %e, body = %body.chars().take(200).collect::<String>(), "weather response did not match expected shape");
            WeatherFailure::BadResponse
        })?;
        let results = parsed.results;
        if !results.temp.is_finite() {
            warn!(temp = results.temp, "weather response has non-finite temperature");
            return Err(WeatherFailure::BadResponse);
        }
        Ok(WeatherReport {
            city_name: results.city_name.unwrap_or_default(),
            temperature_c: results.temp,
            condition_code: results.condition_slug.unwrap_or_default(),
            description: results.description.unwrap_or_default(),
        })
    }
}

/// HG Weather response (only the fields we use).
#[derive(Deserialize)]
struct HgResponse {
    results: HgResults,
}

#[derive(Deserialize)]
struct HgResults {
    /// Celsius. Required; a missing or non-numeric value rejects the payload.
    temp: f64,
    #[serde(default)]
    city_name: Option<String>,
    #[serde(default)]
    condition_slug: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait::async_trait]
impl WeatherPort for HgWeatherAdapter {
    async fn fetch(&self, city: &str, state: &str) -> WeatherResult {
        let Some(key) = self.api_key() else {
            warn!(city, state, "weather API key not configured; skipping lookup");
            return Err(WeatherFailure::ConfigMissing);
        };

        let city_name = Self::city_param(city, state);
        debug!(city = %city_name, url = %self.settings.api_url, "requesting current weather");

        let response = self
            .client
            .get(&self.settings.api_url)
            .query(&[
                ("format", "json"),
                ("locale", self.settings.locale.as_str()),
                ("key", key),
                ("city_name", city_name.as_str()),
            ])
            .timeout(self.settings.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(city = %city_name, error = %e, timeout = e.is_timeout(), "weather request failed");
                WeatherFailure::ProviderUnavailable
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(city = %city_name, status = %status, "weather API returned error status");
            return Err(WeatherFailure::ProviderUnavailable);
        }

        let body = response.text().await.map_err(|e| {
            warn!(city = %city_name, error = %e, "failed to read weather response body");
            WeatherFailure::ProviderUnavailable
        })?;

        let report = Self::parse_body(&body)?;
        info!(
            city = %city_name,
            resolved = %report.city_name,
            temp = report.temperature_c,
            condition = %report.condition_code,
            "weather lookup complete"
        );
        Ok(report)
    }
}
