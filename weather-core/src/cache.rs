//! Time-stamped cache envelopes on top of a [`KeyValueStore`].
//!
//! Expiry is logical: stale entries are ignored on read and overwritten by the
//! next successful fetch, never deleted.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fmt::Debug,
    sync::atomic::{AtomicI64, Ordering},
    time::Duration as StdDuration,
};
use tracing::{debug, warn};

use crate::store::KeyValueStore;

/// Default freshness window.
pub const DEFAULT_FRESHNESS: StdDuration = StdDuration::from_secs(10 * 60);

/// Stored form of a cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub fn weather_key(city: &str) -> String {
    format!("weather_{}", city.to_lowercase())
}

pub fn forecast_key(city: &str) -> String {
    format!("forecast_{}", city.to_lowercase())
}

/// Source of "now" for freshness checks and forecast day filtering.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date in the clock's local time zone.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that only moves when told to. "Today" is the UTC date of `now`.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { millis: AtomicI64::new(start.timestamp_millis()) }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Returns the cached payload under `key` if it is younger than `window`.
///
/// Read and decode failures are logged and reported as a miss.
pub async fn read_fresh<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    now: DateTime<Utc>,
    window: StdDuration,
) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "cache miss");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "cache read error");
            return None;
        }
    };

    let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
        Ok(entry) => entry,
        Err(e) => {
            warn!(key, error = %e, "cache entry is corrupt, ignoring");
            return None;
        }
    };

    let age_ms = now.timestamp_millis() - entry.timestamp;
    if age_ms < window.as_millis() as i64 {
        debug!(key, age_ms, "cache hit");
        Some(entry.data)
    } else {
        debug!(key, age_ms, "cache entry expired");
        None
    }
}

/// Stores `data` under `key` stamped with `now`. Failures are logged only.
pub async fn write_through<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    data: &T,
    now: DateTime<Utc>,
) {
    let entry = CacheEntry { data, timestamp: now.timestamp_millis() };

    let json = match serde_json::to_string(&entry) {
        Ok(json) => json,
        Err(e) => {
            warn!(key, error = %e, "cache serialization error");
            return;
        }
    };

    if let Err(e) = store.set(key, json).await {
        warn!(key, error = %e, "cache write error");
    }
}
