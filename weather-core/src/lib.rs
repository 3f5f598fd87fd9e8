//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Cached current-weather and 5-day forecast lookups against OpenWeather
//! - The key-value store the cache and search history live in
//! - Configuration & credentials handling
//! - Shared domain models and error kinds
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
mod inflight;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod service;
pub mod store;

pub use cache::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ErrorKind, StoreError, WeatherError};
pub use history::{HistoryItem, SearchHistory};
pub use model::{CurrentWeather, ForecastDay, WeatherReport};
pub use provider::OpenWeatherClient;
pub use query::{QueryError, validate_city};
pub use service::WeatherService;
pub use store::{FileStore, KeyValueStore, MemoryStore};
