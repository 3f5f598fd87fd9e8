//! Upstream weather provider.

pub mod openweather;

pub use openweather::{DEFAULT_BASE_URL, OpenWeatherClient};
