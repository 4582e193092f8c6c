//! Mock weather adapter for running without network access.
//!
//! Returns a configurable result and records every call.

use crate::domain::{WeatherReport, WeatherResult};
use crate::ports::WeatherPort;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Mock weather adapter.
///
/// Every `fetch` returns the current configured result. Simulates network
/// latency with an optional delay.
pub struct MockWeatherAdapter {
    result: Mutex<WeatherResult>,
    calls: AtomicUsize,
    last_query: Mutex<Option<(String, String)>>,
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockWeatherAdapter {
    pub fn new(result: WeatherResult) -> Self {
        Self {
            result: Mutex::new(result),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            delay_ms: 0,
        }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Replace the result returned by subsequent calls.
    pub fn set_result(&self, result: WeatherResult) {
        if let Ok(mut r) = self.result.lock() {
            *r = result;
        }
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// City and state of the most recent call.
    pub fn last_query(&self) -> Option<(String, String)> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }
}

impl Default for MockWeatherAdapter {
    /// Mild, sunny afternoon.
    fn default() -> Self {
        Self::new(Ok(WeatherReport {
            city_name: String::new(),
            temperature_c: 25.0,
            condition_code: "clear_day".to_string(),
            description: "[MOCK] Clear sky".to_string(),
        }))
    }
}

#[async_trait::async_trait]
impl WeatherPort for MockWeatherAdapter {
    async fn fetch(&self, city: &str, state: &str) -> WeatherResult {
        info!(city, state, "[MOCK] Simulating weather lookup");
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut q) = self.last_query.lock() {
            *q = Some((city.to_string(), state.to_string()));
        }

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let result = self
            .result
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        // Echo the queried city when no resolved name is configured.
        result.map(|mut report| {
            if report.city_name.is_empty() {
                report.city_name = city.to_string();
            }
            report
        })
    }
}
