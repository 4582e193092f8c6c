//! Wiring & DI. Entry point: bootstrap adapters, inject into services, serve HTTP.
//! No business logic here.

use agenda::adapters::clock::SystemClock;
use agenda::adapters::http;
use agenda::adapters::persistence::{JsonRepo, SqliteRepo};
use agenda::adapters::weather::{HgWeatherAdapter, MockWeatherAdapter};
use agenda::ports::{ContactRepoPort, ContactsPort, WeatherPort};
use agenda::shared::config::{AppConfig, StorageKind, WeatherProviderKind};
use agenda::usecases::{ContactService, EnrichmentService, WeatherCache};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    // --- Weather provider + cache ---
    let provider: Arc<dyn WeatherPort> = match cfg.weather_provider_or_default() {
        WeatherProviderKind::Hg => {
            if !cfg.is_weather_configured() {
                warn!("HG_WEATHER_KEY not set; weather enrichment will report unavailable");
            }
            let settings = cfg.weather_settings();
            info!(
                url = %settings.api_url,
                timeout_ms = settings.timeout.as_millis() as u64,
                "HG Weather provider"
            );
            Arc::new(HgWeatherAdapter::new(settings))
        }
        WeatherProviderKind::Mock => {
            warn!("using mock weather provider (canned data)");
            Arc::new(MockWeatherAdapter::default())
        }
    };
    let policy = cfg.cache_policy();
    info!(
        success_ttl_secs = policy.success_ttl.as_secs(),
        failure_ttl_secs = policy.failure_ttl.as_secs(),
        sweep_threshold = policy.sweep_threshold,
        "weather cache policy"
    );
    let cache = Arc::new(WeatherCache::new(provider, Arc::new(SystemClock), policy));
    let enrichment = Arc::new(EnrichmentService::new(cache));

    // --- Storage ---
    let data_path = PathBuf::from(cfg.data_dir_or_default());
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");
    let repo: Arc<dyn ContactRepoPort> = match cfg.storage_or_default() {
        StorageKind::Sqlite => Arc::new(
            SqliteRepo::connect(&data_path)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
        ),
        StorageKind::Json => Arc::new(
            JsonRepo::open(data_path.join("contacts.json"))
                .await
                .map_err(|e| anyhow::anyhow!("JSON store open failed: {}", e))?,
        ),
    };

    // --- Services ---
    let contacts: Arc<dyn ContactsPort> = Arc::new(ContactService::new(repo, enrichment));

    // --- Serve until Ctrl-C ---
    let bind_addr = cfg.bind_addr_or_default();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {}", bind_addr, e))?;
    http::serve(listener, http::router(contacts), async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown requested");
    })
    .await?;

    Ok(())
}
