use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current conditions for a city, normalized from the provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    /// Degrees Celsius, rounded.
    pub temperature: i32,
    /// Primary weather category, e.g. "Clouds".
    pub condition: String,
    /// Degrees Celsius, rounded.
    pub feels_like: i32,
    pub humidity: u8,
    /// Provider units (m/s for metric requests).
    pub wind_speed: f64,
    /// Kilometers; `None` when the provider did not report it.
    #[serde(default)]
    pub visibility: Option<f64>,
    /// hPa.
    pub pressure: i32,
}

/// One calendar day of the 5-day forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min: i32,
    pub max: i32,
    /// Category of the first 3-hour interval seen for this date.
    pub condition: String,
}

/// Result of a current-weather lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub data: CurrentWeather,
    /// `true` when served from the cache without a network call.
    pub cached: bool,
}
