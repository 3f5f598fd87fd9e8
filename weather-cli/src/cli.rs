use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::warn;
use weather_core::{Config, SearchHistory, WeatherService, validate_city};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,

        /// Cache freshness window in seconds.
        #[arg(long)]
        cache_ttl: Option<u64>,
    },

    /// Show current weather and the next days' forecast for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        city: String,
    },

    /// List or edit recent searches.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Print recent searches (default).
    List,
    /// Remove one entry by id.
    Remove { id: String },
    /// Forget all recent searches.
    Clear,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, cache_ttl } => configure(api_key, cache_ttl),
            Command::Show { city } => show(&city).await,
            Command::History { action } => history(action.unwrap_or(HistoryAction::List)).await,
        }
    }
}

fn configure(api_key: Option<String>, cache_ttl: Option<u64>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };
    config.set_api_key(api_key);
    config.api_key()?;

    if let Some(ttl) = cache_ttl {
        config.cache_ttl_secs = ttl;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(query: &str) -> anyhow::Result<()> {
    let city = validate_city(query)?;

    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;

    let report = service.fetch_weather(city).await.map_err(|e| anyhow!(e.user_message()))?;
    let forecast = service.fetch_forecast(city).await.map_err(|e| anyhow!(e.user_message()))?;

    let history = SearchHistory::new(service.store());
    let country = Some(report.data.country.as_str());
    if let Err(e) = history.add(city, country, service.clock().now()).await {
        warn!(error = %e, "failed to add to search history");
    }

    print!("{}", output::render_report(&report, &forecast));
    Ok(())
}

async fn history(action: HistoryAction) -> anyhow::Result<()> {
    let config = Config::load()?;
    let history = SearchHistory::new(Arc::new(config.store()?));

    match action {
        HistoryAction::List => {
            print!("{}", output::render_history(&history.list().await, Utc::now()));
        }
        HistoryAction::Remove { id } => {
            history.remove(&id).await.context("Failed to update search history")?;
        }
        HistoryAction::Clear => {
            history.clear().await.context("Failed to clear search history")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_without_action_parses() {
        let cli = Cli::try_parse_from(["weather", "history"]).unwrap();
        assert!(matches!(cli.command, Command::History { action: None }));
    }

    #[test]
    fn show_takes_multi_word_city() {
        let cli = Cli::try_parse_from(["weather", "show", "New York"]).unwrap();
        match cli.command {
            Command::Show { city } => assert_eq!(city, "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_accepts_flags() {
        let cli =
            Cli::try_parse_from(["weather", "configure", "--api-key", "K", "--cache-ttl", "60"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Configure { api_key: Some(ref k), cache_ttl: Some(60) } if k == "K"
        ));
    }
}
