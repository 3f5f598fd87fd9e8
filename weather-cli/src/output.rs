use chrono::{DateTime, Utc};
use std::fmt::Write;
use weather_core::{ForecastDay, HistoryItem, WeatherReport, history::format_age};

pub fn render_report(report: &WeatherReport, forecast: &[ForecastDay]) -> String {
    let w = &report.data;
    let mut out = String::new();

    let cached = if report.cached { " (cached)" } else { "" };
    let _ = writeln!(out, "{}, {}{cached}", w.city, w.country);
    let _ = writeln!(out, "  {}, {}°C (feels like {}°C)", w.condition, w.temperature, w.feels_like);
    let visibility = match w.visibility {
        Some(km) => format!("{km} km"),
        None => "unknown".to_string(),
    };
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {} m/s  Visibility {visibility}  Pressure {} hPa",
        w.humidity, w.wind_speed, w.pressure
    );

    if !forecast.is_empty() {
        let _ = writeln!(out, "\nForecast");
        for day in forecast {
            let _ = writeln!(
                out,
                "  {}  {:<12} {:>4}°C / {:>4}°C",
                day.date.format("%a %Y-%m-%d"),
                day.condition,
                day.min,
                day.max
            );
        }
    }

    out
}

pub fn render_history(items: &[HistoryItem], now: DateTime<Utc>) -> String {
    if items.is_empty() {
        return "No recent searches.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let place = match &item.country {
            Some(country) => format!("{}, {country}", item.city_name),
            None => item.city_name.clone(),
        };
        let _ = writeln!(out, "{}  {place:<24} {}", item.id, format_age(item.timestamp, now));
    }
    out
}
