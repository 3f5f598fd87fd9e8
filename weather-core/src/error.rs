//! Error types surfaced by the weather lookups.
//!
//! Every [`WeatherError`] carries a non-empty, human-readable message. Callers
//! that need to branch on the failure should match on [`WeatherError::kind`]
//! rather than inspecting the text.

use thiserror::Error;

/// Machine-readable category of a [`WeatherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RateLimited,
    NotFound,
    Unauthorized,
    Fetch,
    Parse,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP 429 from the provider.
    #[error("{0}")]
    RateLimited(String),

    /// HTTP 404 on the current-weather endpoint.
    #[error("{0}")]
    NotFound(String),

    /// HTTP 401 on the current-weather endpoint.
    #[error("{0}")]
    Unauthorized(String),

    /// Any other non-2xx status.
    #[error("{0}")]
    Fetch(String),

    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("Network request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The provider answered 2xx but the body was not what we expected.
    #[error("{0}")]
    Parse(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::RateLimited(_) => ErrorKind::RateLimited,
            WeatherError::NotFound(_) => ErrorKind::NotFound,
            WeatherError::Unauthorized(_) => ErrorKind::Unauthorized,
            WeatherError::Fetch(_) | WeatherError::Network(_) => ErrorKind::Fetch,
            WeatherError::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Message suitable for showing to an end user.
    ///
    /// Transport failures collapse into a single connectivity hint; everything
    /// else keeps its own text with the first letter capitalized.
    pub fn user_message(&self) -> String {
        const FALLBACK: &str = "An error occurred. Please try again.";

        if let WeatherError::Network(_) = self {
            return "Network connection issue. Please check your internet and try again."
                .to_string();
        }

        let message = self.to_string();
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return FALLBACK.to_string();
        }

        let mut chars = trimmed.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => FALLBACK.to_string(),
        }
    }
}

/// Failure inside a [`crate::store::KeyValueStore`].
///
/// These never escape the public fetch functions; they are logged and the
/// lookup carries on as if the cache were empty.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("stored value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
