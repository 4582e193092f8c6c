//! In-process weather cache in front of a `WeatherPort`.
//!
//! Successes and failures are cached with separate TTLs so a provider outage
//! is retried quickly while good data is reused for minutes. Lookups never
//! fail: whatever the provider returns (including a failure) is cached and
//! handed back.
//!
//! Two concurrent lookups of the same expired key may both reach the
//! provider; the last write wins. The map lock is never held across the
//! provider call.

use crate::domain::{CacheKey, WeatherResult};
use crate::ports::{Clock, WeatherPort};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const DEFAULT_SUCCESS_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_FAILURE_TTL: Duration = Duration::from_secs(30);
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// Expiry settings for `WeatherCache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub success_ttl: Duration,
    pub failure_ttl: Duration,
    /// Once the map holds this many keys, expired entries are dropped on the
    /// next write, at most once per shortest TTL. Live entries are never
    /// evicted. 0 disables the sweep.
    pub sweep_threshold: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            success_ttl: DEFAULT_SUCCESS_TTL,
            failure_ttl: DEFAULT_FAILURE_TTL,
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }
}

impl CachePolicy {
    fn ttl_ms(&self, result: &WeatherResult) -> i64 {
        let ttl = match result {
            Ok(_) => self.success_ttl,
            Err(_) => self.failure_ttl,
        };
        duration_ms(ttl)
    }

    /// Nothing stored after a sweep can expire sooner than this.
    fn sweep_interval_ms(&self) -> i64 {
        duration_ms(self.success_ttl.min(self.failure_ttl))
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: WeatherResult,
    stored_at_ms: i64,
}

impl CacheEntry {
    fn is_fresh(&self, policy: &CachePolicy, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) < policy.ttl_ms(&self.result)
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    last_sweep_ms: Option<i64>,
}

pub struct WeatherCache {
    provider: Arc<dyn WeatherPort>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    state: RwLock<CacheState>,
}

impl WeatherCache {
    pub fn new(provider: Arc<dyn WeatherPort>, clock: Arc<dyn Clock>, policy: CachePolicy) -> Self {
        Self {
            provider,
            clock,
            policy,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Cached result for the city/state pair, refreshed from the provider when
    /// missing or expired.
    pub async fn lookup(&self, city: &str, state: &str) -> WeatherResult {
        let key = CacheKey::new(city, state);

        if let Some(result) = self.fresh(&key).await {
            debug!(city, state, hit = true, "weather cache lookup");
            return result;
        }

        debug!(city, state, hit = false, "weather cache lookup");
        let result = self.provider.fetch(city.trim(), state.trim()).await;
        self.store(key, result.clone()).await;
        result
    }

    /// Number of keys currently held, fresh or not.
    #[cfg(test)]
    async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    async fn fresh(&self, key: &CacheKey) -> Option<WeatherResult> {
        let now = self.clock.now_ms();
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|e| e.is_fresh(&self.policy, now))
            .map(|e| e.result.clone())
    }

    async fn store(&self, key: CacheKey, result: WeatherResult) {
        let now = self.clock.now_ms();
        let mut state = self.state.write().await;

        if self.sweep_due(&state, now) {
            let before = state.entries.len();
            state.entries.retain(|_, e| e.is_fresh(&self.policy, now));
            state.last_sweep_ms = Some(now);
            info!(
                dropped = before - state.entries.len(),
                kept = state.entries.len(),
                "swept expired weather cache entries"
            );
        }

        state.entries.insert(
            key,
            CacheEntry {
                result,
                stored_at_ms: now,
            },
        );
    }

    fn sweep_due(&self, state: &CacheState, now_ms: i64) -> bool {
        if self.policy.sweep_threshold == 0 || state.entries.len() < self.policy.sweep_threshold {
            return false;
        }
        match state.last_sweep_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.policy.sweep_interval_ms(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::weather::MockWeatherAdapter;
    use crate::domain::{WeatherFailure, WeatherReport};

    fn report() -> WeatherReport {
        WeatherReport {
            city_name: "Rio de Janeiro, RJ".to_string(),
            temperature_c: 31.0,
            condition_code: "clear_day".to_string(),
            description: "Tempo limpo".to_string(),
        }
    }

    fn cache_with(
        provider: Arc<MockWeatherAdapter>,
        clock: Arc<ManualClock>,
        policy: CachePolicy,
    ) -> WeatherCache {
        WeatherCache::new(provider, clock, policy)
    }

    #[tokio::test]
    async fn test_success_reused_within_ttl() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = cache_with(provider.clone(), clock.clone(), CachePolicy::default());

        let first = cache.lookup("Rio de Janeiro", "RJ").await;
        clock.advance(Duration::from_secs(60));
        let second = cache.lookup("Rio de Janeiro", "RJ").await;
        clock.advance(Duration::from_secs(239));
        let third = cache.lookup("Rio de Janeiro", "RJ").await;

        assert_eq!(first, Ok(report()));
        assert_eq!(second, first);
        assert_eq!(third, first);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_success_refreshed_after_ttl() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(0));
        let cache = cache_with(provider.clone(), clock.clone(), CachePolicy::default());

        let _ = cache.lookup("Rio de Janeiro", "RJ").await;
        clock.advance(DEFAULT_SUCCESS_TTL);
        let _ = cache.lookup("Rio de Janeiro", "RJ").await;

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_retried_after_failure_ttl_not_before() {
        let provider = Arc::new(MockWeatherAdapter::new(Err(WeatherFailure::ProviderUnavailable)));
        let clock = Arc::new(ManualClock::new(0));
        let cache = cache_with(provider.clone(), clock.clone(), CachePolicy::default());

        assert_eq!(
            cache.lookup("Recife", "PE").await,
            Err(WeatherFailure::ProviderUnavailable)
        );
        clock.advance(Duration::from_secs(29));
        assert_eq!(
            cache.lookup("Recife", "PE").await,
            Err(WeatherFailure::ProviderUnavailable)
        );
        assert_eq!(provider.calls(), 1);

        provider.set_result(Ok(report()));
        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.lookup("Recife", "PE").await, Ok(report()));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_config_missing_uses_failure_ttl() {
        let provider = Arc::new(MockWeatherAdapter::new(Err(WeatherFailure::ConfigMissing)));
        let clock = Arc::new(ManualClock::new(0));
        let cache = cache_with(provider.clone(), clock.clone(), CachePolicy::default());

        let _ = cache.lookup("Natal", "RN").await;
        clock.advance(DEFAULT_FAILURE_TTL);
        let _ = cache.lookup("Natal", "RN").await;

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_spellings_share_one_entry() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(0));
        let cache = cache_with(provider.clone(), clock, CachePolicy::default());

        let _ = cache.lookup("Rio de Janeiro", "RJ").await;
        let _ = cache.lookup("  rio de janeiro ", " rj ").await;
        let _ = cache.lookup("RIO DE JANEIRO", "rj").await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_provider_receives_trimmed_input() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(0));
        let cache = cache_with(provider.clone(), clock, CachePolicy::default());

        let _ = cache.lookup("  Campinas ", " SP").await;

        assert_eq!(
            provider.last_query(),
            Some(("Campinas".to_string(), "SP".to_string()))
        );
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(0));
        let cache = cache_with(provider.clone(), clock, CachePolicy::default());

        let _ = cache.lookup("Rio de Janeiro", "RJ").await;
        let _ = cache.lookup("Niterói", "RJ").await;
        let _ = cache.lookup("Rio de Janeiro", "").await;

        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_sweep_drops_only_expired_entries() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(0));
        let policy = CachePolicy {
            sweep_threshold: 2,
            ..CachePolicy::default()
        };
        let cache = cache_with(provider.clone(), clock.clone(), policy);

        let _ = cache.lookup("Belém", "PA").await;
        clock.advance(DEFAULT_SUCCESS_TTL);
        let _ = cache.lookup("Manaus", "AM").await;
        // Belém is expired, Manaus is live; the third write triggers the sweep.
        let _ = cache.lookup("Macapá", "AP").await;

        assert_eq!(cache.len().await, 2);
        let _ = cache.lookup("Manaus", "AM").await;
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_sweep_waits_for_shortest_ttl_between_runs() {
        let provider = Arc::new(MockWeatherAdapter::new(Ok(report())));
        let clock = Arc::new(ManualClock::new(0));
        let policy = CachePolicy {
            success_ttl: Duration::from_secs(10),
            failure_ttl: Duration::from_secs(10),
            sweep_threshold: 2,
        };
        let cache = cache_with(provider, clock.clone(), policy);

        let _ = cache.lookup("Belém", "PA").await;
        clock.advance(Duration::from_secs(5));
        let _ = cache.lookup("Manaus", "AM").await;
        // First sweep at t=5 finds nothing expired.
        let _ = cache.lookup("Macapá", "AP").await;
        assert_eq!(cache.len().await, 3);

        // Belém expired at t=10, but the last sweep was only 6 s ago.
        clock.advance(Duration::from_secs(6));
        let _ = cache.lookup("Boa Vista", "RR").await;
        assert_eq!(cache.len().await, 4);

        // t=15: Belém, Manaus and Macapá are expired; Boa Vista is live.
        clock.advance(Duration::from_secs(4));
        let _ = cache.lookup("Palmas", "TO").await;
        assert_eq!(cache.len().await, 2);
    }
}
