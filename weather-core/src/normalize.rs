//! Reshapes provider payloads into [`CurrentWeather`] and [`ForecastDay`].

use chrono::NaiveDate;

use crate::{
    error::WeatherError,
    model::{CurrentWeather, ForecastDay},
    provider::openweather::{OwCurrentResponse, OwForecastEntry},
};

/// Maximum number of days returned by [`bucket_forecast`].
pub const FORECAST_DAYS: usize = 5;

pub fn normalize_current(raw: OwCurrentResponse) -> Result<CurrentWeather, WeatherError> {
    let condition = raw
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .ok_or_else(|| WeatherError::Parse("Weather response contained no conditions".into()))?;

    Ok(CurrentWeather {
        city: raw.name,
        country: raw.sys.country,
        temperature: round_temp(raw.main.temp),
        condition,
        feels_like: round_temp(raw.main.feels_like),
        humidity: raw.main.humidity,
        wind_speed: raw.wind.speed,
        visibility: raw.visibility.map(|meters| meters / 1000.0),
        pressure: raw.main.pressure,
    })
}

/// Groups 3-hour intervals into per-date buckets.
///
/// Buckets keep first-seen order. A bucket's condition is the one of the first
/// interval seen for that date and is never revised by later intervals. The
/// bucket for `today` is dropped and at most [`FORECAST_DAYS`] are returned.
pub fn bucket_forecast(
    intervals: &[OwForecastEntry],
    today: NaiveDate,
) -> Result<Vec<ForecastDay>, WeatherError> {
    let mut days: Vec<ForecastDay> = Vec::new();

    for entry in intervals {
        let date = interval_date(&entry.dt_txt)?;
        let temp_min = round_temp(entry.main.temp_min);
        let temp_max = round_temp(entry.main.temp_max);

        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.min = day.min.min(temp_min);
                day.max = day.max.max(temp_max);
            }
            None => {
                let condition = entry.weather.first().map(|w| w.main.clone()).ok_or_else(|| {
                    WeatherError::Parse(format!(
                        "Forecast interval {} contained no conditions",
                        entry.dt_txt
                    ))
                })?;
                days.push(ForecastDay { date, min: temp_min, max: temp_max, condition });
            }
        }
    }

    Ok(days.into_iter().filter(|d| d.date != today).take(FORECAST_DAYS).collect())
}

fn interval_date(dt_txt: &str) -> Result<NaiveDate, WeatherError> {
    let date_part = dt_txt.split(' ').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| WeatherError::Parse(format!("Invalid forecast timestamp '{dt_txt}': {e}")))
}

/// Nearest integer, halves away from zero.
fn round_temp(value: f64) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{OwForecastMain, OwMain, OwSys, OwWeather, OwWind};

    fn entry(dt_txt: &str, temp_min: f64, temp_max: f64, main: &str) -> OwForecastEntry {
        OwForecastEntry {
            dt_txt: dt_txt.to_string(),
            main: OwForecastMain { temp_min, temp_max },
            weather: vec![OwWeather { main: main.to_string() }],
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn current(temp: f64, visibility: Option<f64>) -> OwCurrentResponse {
        OwCurrentResponse {
            name: "Paris".into(),
            sys: OwSys { country: "FR".into() },
            main: OwMain { temp, feels_like: 20.4, humidity: 64, pressure: 1015 },
            weather: vec![OwWeather { main: "Clouds".into() }],
            wind: OwWind { speed: 4.12 },
            visibility,
        }
    }

    #[test]
    fn current_rounds_temperatures_and_converts_visibility() {
        let weather = normalize_current(current(21.6, Some(10000.0))).unwrap();

        assert_eq!(weather.temperature, 22);
        assert_eq!(weather.feels_like, 20);
        assert_eq!(weather.visibility, Some(10.0));
        assert_eq!(weather.city, "Paris");
        assert_eq!(weather.country, "FR");
        assert_eq!(weather.condition, "Clouds");
        assert_eq!(weather.humidity, 64);
        assert_eq!(weather.pressure, 1015);
        assert_eq!(weather.wind_speed, 4.12);
    }

    #[test]
    fn current_keeps_fractional_visibility() {
        let weather = normalize_current(current(-0.4, Some(2500.0))).unwrap();

        assert_eq!(weather.visibility, Some(2.5));
        assert_eq!(weather.temperature, 0);
    }

    #[test]
    fn current_without_visibility_is_still_reported() {
        let weather = normalize_current(current(12.0, None)).unwrap();

        assert_eq!(weather.visibility, None);
        assert_eq!(weather.temperature, 12);
    }

    #[test]
    fn current_without_conditions_is_parse_error() {
        let mut raw = current(10.0, Some(10000.0));
        raw.weather.clear();

        let err = normalize_current(raw).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }

    #[test]
    fn bucket_keeps_first_seen_condition() {
        let intervals = vec![
            entry("2024-01-01 00:00:00", 5.0, 10.0, "Clouds"),
            entry("2024-01-01 12:00:00", 8.0, 15.0, "Rain"),
        ];

        let days = bucket_forecast(&intervals, date("2023-12-31")).unwrap();

        assert_eq!(
            days,
            vec![ForecastDay { date: date("2024-01-01"), min: 5, max: 15, condition: "Clouds".into() }]
        );
    }

    #[test]
    fn bucket_rounds_before_aggregating() {
        let intervals = vec![
            entry("2024-01-02 00:00:00", 4.5, 9.4, "Clear"),
            entry("2024-01-02 03:00:00", 4.6, 9.5, "Clear"),
        ];

        let days = bucket_forecast(&intervals, date("2024-01-01")).unwrap();

        assert_eq!(days[0].min, 5);
        assert_eq!(days[0].max, 10);
    }

    #[test]
    fn today_is_excluded_and_output_is_capped() {
        let mut intervals = Vec::new();
        for day in 1..=7 {
            intervals.push(entry(&format!("2024-03-0{day} 09:00:00"), 1.0, 2.0, "Clear"));
            intervals.push(entry(&format!("2024-03-0{day} 21:00:00"), 0.0, 3.0, "Snow"));
        }

        let days = bucket_forecast(&intervals, date("2024-03-01")).unwrap();

        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, date("2024-03-02"));
        assert_eq!(days[4].date, date("2024-03-06"));
        assert!(days.iter().all(|d| d.condition == "Clear" && d.min == 0 && d.max == 3));
    }

    #[test]
    fn today_in_the_middle_is_still_excluded() {
        let intervals = vec![
            entry("2024-03-01 21:00:00", 1.0, 2.0, "Clear"),
            entry("2024-03-02 00:00:00", 1.0, 2.0, "Rain"),
            entry("2024-03-03 00:00:00", 1.0, 2.0, "Snow"),
        ];

        let days = bucket_forecast(&intervals, date("2024-03-02")).unwrap();

        let dates: Vec<_> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date("2024-03-01"), date("2024-03-03")]);
    }

    #[test]
    fn empty_list_gives_empty_forecast() {
        let days = bucket_forecast(&[], date("2024-03-02")).unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn malformed_timestamp_is_parse_error() {
        let intervals = vec![entry("yesterday-ish", 1.0, 2.0, "Clear")];

        let err = bucket_forecast(&intervals, date("2024-03-02")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }
}
