//! Application configuration. Listen address, storage, weather provider.

use crate::adapters::weather::HgWeatherSettings;
use crate::adapters::weather::hg_adapter::{DEFAULT_API_URL, DEFAULT_LOCALE};
use crate::usecases::CachePolicy;
use crate::usecases::weather_cache::{
    DEFAULT_FAILURE_TTL, DEFAULT_SUCCESS_TTL, DEFAULT_SWEEP_THRESHOLD,
};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_WEATHER_TIMEOUT_MS: u64 = 5000;

/// Contact storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Sqlite,
    Json,
}

/// Weather provider implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherProviderKind {
    #[default]
    Hg,
    /// Canned data, no network. For local development.
    Mock,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Socket address to listen on. Read from AGENDA_BIND_ADDR; PORT alone also works.
    #[serde(default)]
    pub bind_addr: Option<String>,

    /// Directory for the contact database. Read from AGENDA_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    #[serde(default)]
    pub storage: Option<StorageKind>,

    // ─────────────────────────────────────────────────────────────────────────
    // Weather Provider Configuration
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub weather_provider: Option<WeatherProviderKind>,

    /// HG Weather API key. Read from AGENDA_WEATHER_API_KEY or HG_WEATHER_KEY.
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Provider endpoint. Defaults to HG Weather.
    #[serde(default)]
    pub weather_api_url: Option<String>,

    /// Language of weather descriptions (default "pt").
    #[serde(default)]
    pub weather_locale: Option<String>,

    /// Per-request timeout in ms (default 5000).
    #[serde(default)]
    pub weather_timeout_ms: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Weather Cache Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// How long a successful lookup is reused (default 300).
    #[serde(default)]
    pub weather_success_ttl_secs: Option<u64>,

    /// How long a failed lookup is reused before retrying (default 30).
    #[serde(default)]
    pub weather_failure_ttl_secs: Option<u64>,

    /// Key count that triggers an expired-entry sweep (default 1024, 0 disables).
    #[serde(default)]
    pub weather_cache_sweep_threshold: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        // No try_parsing: API keys that look numeric must reach us unchanged.
        c = c.add_source(config::Environment::with_prefix("AGENDA"));
        if let Ok(path) = std::env::var("AGENDA_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // PORT is read directly (no prefix) for hosting platforms that inject it.
        if cfg.bind_addr.is_none() {
            if let Ok(port) = std::env::var("PORT") {
                if let Ok(port) = port.parse::<u16>() {
                    cfg.bind_addr = Some(format!("0.0.0.0:{}", port));
                }
            }
        }
        Ok(cfg)
    }

    pub fn bind_addr_or_default(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    pub fn storage_or_default(&self) -> StorageKind {
        self.storage.unwrap_or_default()
    }

    pub fn weather_provider_or_default(&self) -> WeatherProviderKind {
        self.weather_provider.unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Weather Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the weather API key if configured. Reads from config or HG_WEATHER_KEY env.
    pub fn weather_api_key(&self) -> Option<String> {
        self.weather_api_key
            .clone()
            .or_else(|| std::env::var("HG_WEATHER_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns true if the weather API key is present.
    pub fn is_weather_configured(&self) -> bool {
        self.weather_api_key().is_some()
    }

    pub fn weather_settings(&self) -> HgWeatherSettings {
        HgWeatherSettings {
            api_url: self
                .weather_api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: self.weather_api_key(),
            locale: self
                .weather_locale
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            timeout: Duration::from_millis(
                self.weather_timeout_ms
                    .unwrap_or(DEFAULT_WEATHER_TIMEOUT_MS),
            ),
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            success_ttl: self
                .weather_success_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SUCCESS_TTL),
            failure_ttl: self
                .weather_failure_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FAILURE_TTL),
            sweep_threshold: self
                .weather_cache_sweep_threshold
                .unwrap_or(DEFAULT_SWEEP_THRESHOLD),
        }
    }
}
