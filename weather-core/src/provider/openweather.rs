use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::WeatherError;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Thin client for the two OpenWeather endpoints we consume.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_client(api_key, base_url, Client::new())
    }

    /// Use a preconfigured `reqwest` client, e.g. one with a request timeout.
    pub fn with_client(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key: api_key.into(), base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/weather` for `city`.
    pub async fn current(&self, city: &str) -> Result<OwCurrentResponse, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        debug!(%url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = res.status();
        if !status.is_success() {
            let api_message = read_api_message(res).await;
            return Err(classify_current(status, api_message));
        }

        parse_body(res, "current weather").await
    }

    /// `GET {base}/forecast` for `city`, 40 three-hour intervals.
    pub async fn forecast(&self, city: &str) -> Result<OwForecastResponse, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        debug!(%url, city, "requesting forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("cnt", "40"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = res.status();
        if !status.is_success() {
            return Err(classify_forecast(status));
        }

        parse_body(res, "forecast").await
    }
}

/// Maps a non-2xx current-weather status to an error.
///
/// 404 always uses our own wording; the other statuses append the provider's
/// `message` when it sent one. The provider text is appended rather than
/// substituted so the message always names the category (for example
/// "Rate limit exceeded") even when the provider's wording does not.
pub(crate) fn classify_current(status: StatusCode, api_message: Option<String>) -> WeatherError {
    let with_detail = |base: &str| match &api_message {
        Some(detail) => format!("{base} ({detail})"),
        None => base.to_string(),
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            WeatherError::RateLimited(with_detail("Rate limit exceeded. Please try again later."))
        }
        StatusCode::NOT_FOUND => WeatherError::NotFound(
            "City not found.\nPlease check the city name and try again.".to_string(),
        ),
        StatusCode::UNAUTHORIZED => WeatherError::Unauthorized(with_detail(
            "Invalid API key. Please check your configuration.",
        )),
        _ => WeatherError::Fetch(with_detail(&format!(
            "Failed to fetch weather data (HTTP {}). Please try again.",
            status.as_u16()
        ))),
    }
}

/// The forecast endpoint only singles out rate limiting.
pub(crate) fn classify_forecast(status: StatusCode) -> WeatherError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        WeatherError::RateLimited("Forecast rate limit exceeded. Try again later.".to_string())
    } else {
        WeatherError::Fetch(format!("Failed to fetch forecast data (HTTP {}).", status.as_u16()))
    }
}

async fn read_api_message(res: Response) -> Option<String> {
    #[derive(Deserialize)]
    struct OwErrorBody {
        message: Option<String>,
    }

    let body = res.text().await.ok()?;
    serde_json::from_str::<OwErrorBody>(&body)
        .ok()?
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

async fn parse_body<T: DeserializeOwned>(res: Response, what: &str) -> Result<T, WeatherError> {
    let body = res
        .text()
        .await
        .map_err(|e| WeatherError::Parse(format!("Failed to read {what} response body: {e}")))?;

    serde_json::from_str(&body).map_err(|e| {
        WeatherError::Parse(format!(
            "Failed to parse {what} JSON: {e} (body: {})",
            truncate_body(&body)
        ))
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub main: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwSys {
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub sys: OwSys,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
    /// Meters. OpenWeather leaves this out for some stations.
    #[serde(default)]
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastMain {
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastEntry {
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub dt_txt: String,
    pub main: OwForecastMain,
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<OwForecastEntry>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
