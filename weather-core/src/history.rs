//! Recent searches, most recent first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::{error::StoreError, store::KeyValueStore};

pub const HISTORY_KEY: &str = "searchHistory";
pub const MAX_HISTORY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub city_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored items. Missing, unreadable or corrupt history reads as empty.
    pub async fn list(&self) -> Vec<HistoryItem> {
        self.load().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load search history");
            Vec::new()
        })
    }

    /// Stored items, surfacing read and decode failures so that edits never
    /// overwrite history that could not be read.
    async fn load(&self) -> Result<Vec<HistoryItem>, StoreError> {
        match self.store.get(HISTORY_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Puts `city_name` at the front, dropping older entries for the same
    /// city (case-insensitive) and anything beyond [`MAX_HISTORY`].
    pub async fn add(
        &self,
        city_name: &str,
        country: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<HistoryItem>, StoreError> {
        let millis = now.timestamp_millis();
        let item = HistoryItem {
            id: millis.to_string(),
            city_name: city_name.to_string(),
            country: country.map(str::to_string),
            timestamp: millis,
        };

        let needle = city_name.to_lowercase();
        let existing = self.load().await?;
        let updated: Vec<HistoryItem> = std::iter::once(item)
            .chain(existing.into_iter().filter(|i| i.city_name.to_lowercase() != needle))
            .take(MAX_HISTORY)
            .collect();

        self.save(&updated).await?;
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<Vec<HistoryItem>, StoreError> {
        let mut items = self.load().await?;
        items.retain(|i| i.id != id);
        self.save(&items).await?;
        Ok(items)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.save(&[]).await
    }

    async fn save(&self, items: &[HistoryItem]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items)
            .map_err(|e| StoreError::Unavailable(format!("failed to encode history: {e}")))?;
        self.store.set(HISTORY_KEY, json).await
    }
}

/// Coarse age of a history entry: "3d ago", "5h ago" or "Just now".
pub fn format_age(timestamp: i64, now: DateTime<Utc>) -> String {
    let hours = (now.timestamp_millis() - timestamp) / (1000 * 60 * 60);
    let days = hours / 24;

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else {
        "Just now".to_string()
    }
}
