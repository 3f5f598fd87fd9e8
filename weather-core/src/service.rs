//! Cached lookups: cache read, remote fetch on miss, normalize, write-through.

use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, warn};

use crate::{
    cache::{self, Clock, DEFAULT_FRESHNESS, SystemClock},
    config::Config,
    error::WeatherError,
    inflight::KeyedLocks,
    model::{CurrentWeather, ForecastDay, WeatherReport},
    normalize,
    provider::OpenWeatherClient,
    store::KeyValueStore,
};

pub struct WeatherService {
    client: OpenWeatherClient,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    freshness: Duration,
    locks: KeyedLocks,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("base_url", &self.client.base_url())
            .field("store", &self.store)
            .field("freshness", &self.freshness)
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            store,
            clock: Arc::new(SystemClock),
            freshness: DEFAULT_FRESHNESS,
            locks: KeyedLocks::default(),
        }
    }

    /// Build the production service: file-backed cache, system clock.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = OpenWeatherClient::new(config.api_key()?, config.base_url.as_str());
        let store = config.store()?;

        Ok(Self::new(client, Arc::new(store)).with_freshness(config.freshness()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// The store backing the cache, for callers that persist alongside it.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Current conditions for `city`, from cache when fresh.
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let key = cache::weather_key(city);
        let _guard = self.locks.lock(&key).await;

        if let Some(data) = cache::read_fresh::<CurrentWeather>(
            self.store.as_ref(),
            &key,
            self.clock.now(),
            self.freshness,
        )
        .await
        {
            return Ok(WeatherReport { data, cached: true });
        }

        let data = self
            .client
            .current(city)
            .await
            .and_then(normalize::normalize_current)
            .inspect_err(|e| warn!(city, error = %e, "weather fetch failed"))?;

        cache::write_through(self.store.as_ref(), &key, &data, self.clock.now()).await;
        debug!(city, "weather fetched and cached");

        Ok(WeatherReport { data, cached: false })
    }

    /// Up to five upcoming days for `city`, excluding today, from cache when fresh.
    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastDay>, WeatherError> {
        let key = cache::forecast_key(city);
        let _guard = self.locks.lock(&key).await;

        if let Some(days) = cache::read_fresh::<Vec<ForecastDay>>(
            self.store.as_ref(),
            &key,
            self.clock.now(),
            self.freshness,
        )
        .await
        {
            return Ok(days);
        }

        let days = self
            .client
            .forecast(city)
            .await
            .and_then(|raw| normalize::bucket_forecast(&raw.list, self.clock.today()))
            .inspect_err(|e| warn!(city, error = %e, "forecast fetch failed"))?;

        cache::write_through(self.store.as_ref(), &key, &days, self.clock.now()).await;
        debug!(city, days = days.len(), "forecast fetched and cached");

        Ok(days)
    }
}
