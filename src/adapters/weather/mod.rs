//! Weather adapters. Implement WeatherPort.
//!
//! Provides the HG Weather HTTP adapter and a mock adapter for offline use and tests.

pub mod hg_adapter;
pub mod mock_adapter;

pub use hg_adapter::{HgWeatherAdapter, HgWeatherSettings};
pub use mock_adapter::MockWeatherAdapter;
