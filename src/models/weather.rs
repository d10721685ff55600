//! Forecast snapshot model with parallel hourly/daily series
//!
//! The hourly and daily blocks mirror the Open-Meteo response layout: each
//! block holds parallel arrays that are index-aligned by construction of the
//! upstream API. Slicing helpers preserve that alignment and clamp to the
//! shortest array rather than index out of bounds.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::location::LocationMatch;

/// Number of entries in the rolling hourly outlook window
pub const WINDOW_HOURS: usize = 24;

/// Full forecast payload for one location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherSnapshot {
    /// Current conditions block
    pub current: CurrentConditions,
    /// Hourly series over the forecast horizon
    pub hourly: HourlySeries,
    /// Daily series over the forecast horizon
    pub daily: DailySeries,
}

/// Current conditions block
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentConditions {
    /// Air temperature at 2m in Celsius
    pub temperature_2m: f64,
    /// Relative humidity at 2m in percent
    pub relative_humidity_2m: f64,
    /// Apparent (feels-like) temperature in Celsius
    pub apparent_temperature: f64,
    /// 1 during daylight, 0 at night
    pub is_day: u8,
    /// Precipitation in mm
    pub precipitation: f64,
    /// WMO weather code
    pub weather_code: u16,
    /// Wind speed at 10m in km/h
    pub wind_speed_10m: f64,
}

/// Hourly series, index-aligned parallel arrays starting at local midnight
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HourlySeries {
    /// ISO-8601 local timestamps
    pub time: Vec<String>,
    /// Temperatures in Celsius
    pub temperature_2m: Vec<f64>,
    /// WMO weather codes
    pub weather_code: Vec<u16>,
}

/// One aligned hourly entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyEntry {
    /// ISO-8601 local timestamp
    pub time: String,
    /// Temperature in Celsius
    pub temperature_2m: f64,
    /// WMO weather code
    pub weather_code: u16,
}

impl HourlySeries {
    /// Length of the shortest parallel array
    #[must_use]
    pub fn aligned_len(&self) -> usize {
        self.time
            .len()
            .min(self.temperature_2m.len())
            .min(self.weather_code.len())
    }

    /// Contiguous window of up to `len` aligned entries starting at `start`.
    ///
    /// The series spans the full forecast horizon, so a window starting late
    /// in the day runs into the next calendar day naturally. Indices are
    /// clamped to the shortest parallel array; a window that would run past
    /// the end truncates instead of indexing out of bounds.
    #[must_use]
    pub fn window_from(&self, start: usize, len: usize) -> Vec<HourlyEntry> {
        let aligned = self.aligned_len();
        let start = start.min(aligned);
        let end = start.saturating_add(len).min(aligned);

        (start..end)
            .map(|i| HourlyEntry {
                time: self.time[i].clone(),
                temperature_2m: self.temperature_2m[i],
                weather_code: self.weather_code[i],
            })
            .collect()
    }
}

impl HourlyEntry {
    /// 12-hour clock label for this entry, e.g. `3 PM`
    #[must_use]
    pub fn hour_label(&self) -> String {
        match NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M") {
            Ok(dt) => dt.format("%-I %p").to_string(),
            Err(_) => self.time.clone(),
        }
    }
}

/// Daily series, index-aligned parallel arrays starting at today
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DailySeries {
    /// ISO-8601 dates
    pub time: Vec<String>,
    /// WMO weather codes
    pub weather_code: Vec<u16>,
    /// Daily maximum temperatures in Celsius
    pub temperature_2m_max: Vec<f64>,
    /// Daily minimum temperatures in Celsius
    pub temperature_2m_min: Vec<f64>,
    /// Sunrise timestamps
    #[serde(default)]
    pub sunrise: Vec<String>,
    /// Sunset timestamps
    #[serde(default)]
    pub sunset: Vec<String>,
}

/// One aligned daily entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyEntry {
    /// ISO-8601 date
    pub time: String,
    /// WMO weather code
    pub weather_code: u16,
    /// Daily maximum temperature in Celsius
    pub temperature_2m_max: f64,
    /// Daily minimum temperature in Celsius
    pub temperature_2m_min: f64,
    /// Sunrise timestamp, when provided upstream
    pub sunrise: Option<String>,
    /// Sunset timestamp, when provided upstream
    pub sunset: Option<String>,
}

impl DailySeries {
    /// Length of the shortest required parallel array
    #[must_use]
    pub fn aligned_len(&self) -> usize {
        self.time
            .len()
            .min(self.weather_code.len())
            .min(self.temperature_2m_max.len())
            .min(self.temperature_2m_min.len())
    }

    /// All aligned daily entries, clamped to the shortest parallel array
    #[must_use]
    pub fn days(&self) -> Vec<DailyEntry> {
        (0..self.aligned_len())
            .map(|i| DailyEntry {
                time: self.time[i].clone(),
                weather_code: self.weather_code[i],
                temperature_2m_max: self.temperature_2m_max[i],
                temperature_2m_min: self.temperature_2m_min[i],
                sunrise: self.sunrise.get(i).cloned(),
                sunset: self.sunset.get(i).cloned(),
            })
            .collect()
    }
}

impl DailyEntry {
    /// Short weekday label for this entry, e.g. `Mon`
    #[must_use]
    pub fn day_label(&self) -> String {
        match NaiveDate::parse_from_str(&self.time, "%Y-%m-%d") {
            Ok(date) => date.format("%a").to_string(),
            Err(_) => self.time.clone(),
        }
    }
}

/// Resolved location together with its fetched snapshot
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResolvedWeather {
    /// The location the snapshot was fetched for
    pub location: LocationMatch,
    /// The fetched forecast payload
    pub snapshot: WeatherSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_of_len(len: usize) -> HourlySeries {
        HourlySeries {
            time: (0..len)
                .map(|i| format!("2024-06-{:02}T{:02}:00", 1 + i / 24, i % 24))
                .collect(),
            temperature_2m: (0..len).map(|i| i as f64 / 10.0).collect(),
            weather_code: (0..len).map(|i| (i % 100) as u16).collect(),
        }
    }

    #[test]
    fn test_window_starts_at_current_hour() {
        let series = series_of_len(168);
        let window = series.window_from(20, WINDOW_HOURS);
        assert_eq!(window.len(), 24);
        assert_eq!(window[0].time, "2024-06-01T20:00");
        assert_eq!(window[0].temperature_2m, 2.0);
        // Window runs into the next calendar day
        assert_eq!(window[4].time, "2024-06-02T00:00");
        assert_eq!(window[23].time, "2024-06-02T19:00");
    }

    #[test]
    fn test_window_truncates_at_series_end() {
        // Short series: window runs past the end and clamps silently
        let series = series_of_len(30);
        let window = series.window_from(23, WINDOW_HOURS);
        assert_eq!(window.len(), 7);
        assert_eq!(window[0].time, "2024-06-01T23:00");
    }

    #[test]
    fn test_window_start_past_end_is_empty() {
        let series = series_of_len(10);
        assert!(series.window_from(48, WINDOW_HOURS).is_empty());
    }

    #[test]
    fn test_window_clamps_to_shortest_parallel_array() {
        let mut series = series_of_len(168);
        series.weather_code.truncate(25);
        let window = series.window_from(20, WINDOW_HOURS);
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn test_hour_label() {
        let entry = HourlyEntry {
            time: "2024-06-01T15:00".to_string(),
            temperature_2m: 20.0,
            weather_code: 0,
        };
        assert_eq!(entry.hour_label(), "3 PM");

        let midnight = HourlyEntry {
            time: "2024-06-01T00:00".to_string(),
            temperature_2m: 20.0,
            weather_code: 0,
        };
        assert_eq!(midnight.hour_label(), "12 AM");
    }

    #[test]
    fn test_daily_days_aligned() {
        let daily = DailySeries {
            time: vec!["2024-06-03".to_string(), "2024-06-04".to_string()],
            weather_code: vec![0, 63],
            temperature_2m_max: vec![25.0, 19.0],
            temperature_2m_min: vec![14.0, 11.0],
            sunrise: vec!["2024-06-03T05:12".to_string()],
            sunset: vec![],
        };
        let days = daily.days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_label(), "Mon");
        assert_eq!(days[0].sunrise.as_deref(), Some("2024-06-03T05:12"));
        assert!(days[1].sunrise.is_none());
    }

    #[test]
    fn test_daily_days_clamp_to_shortest() {
        let daily = DailySeries {
            time: vec![
                "2024-06-03".to_string(),
                "2024-06-04".to_string(),
                "2024-06-05".to_string(),
            ],
            weather_code: vec![0, 63],
            temperature_2m_max: vec![25.0, 19.0, 18.0],
            temperature_2m_min: vec![14.0, 11.0, 10.0],
            sunrise: vec![],
            sunset: vec![],
        };
        assert_eq!(daily.days().len(), 2);
    }
}
