//! Weather data for dressday
//!
//! Current conditions from Open-Meteo, normalized into a [`WeatherSnapshot`]
//! and cached per ~1 km coordinate bucket with stale-on-failure fallback.

pub mod cache;
pub mod normalize;
pub mod provider;
pub mod retry;
pub mod service;
pub mod types;

pub use cache::{cache_key, CacheEntry, WeatherCache};
pub use normalize::normalize;
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use retry::RetryConfig;
pub use service::WeatherService;
pub use types::*;
