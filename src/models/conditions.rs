//! WMO weather-code classification
//!
//! The six-bucket [`WeatherKind`] drives icon selection; [`Theme`] is the
//! narrower four-bucket layer on top of it used for background selection
//! (fog collapses into the cloudy theme, thunderstorm into the rainy theme).
//! Both use inclusive upper-bound thresholds checked in ascending order.

use serde::{Deserialize, Serialize};

/// Semantic category of a WMO weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    /// Clear or mainly clear sky (codes 0-1)
    Sunny,
    /// Partly cloudy or overcast (codes 2-3)
    Cloudy,
    /// Fog and rime fog (codes up to 48)
    Fog,
    /// Drizzle and rain (codes up to 67)
    Rain,
    /// Snow and snow showers (codes up to 86)
    Snow,
    /// Thunderstorm (codes up to 99)
    Thunderstorm,
}

impl WeatherKind {
    /// Classify a WMO weather code
    #[must_use]
    pub fn from_wmo_code(code: u16) -> Self {
        if code <= 1 {
            Self::Sunny
        } else if code <= 3 {
            Self::Cloudy
        } else if code <= 48 {
            Self::Fog
        } else if code <= 67 {
            Self::Rain
        } else if code <= 86 {
            Self::Snow
        } else if code <= 99 {
            Self::Thunderstorm
        } else {
            // Out-of-range codes default to clear
            Self::Sunny
        }
    }

    /// Icon name for this category
    #[must_use]
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Sunny => "sun",
            Self::Cloudy => "cloud",
            Self::Fog => "fog",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "lightning",
        }
    }
}

/// Background theme derived from the current weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl Theme {
    /// Theme for a WMO weather code, collapsing the six kinds into four
    #[must_use]
    pub fn from_wmo_code(code: u16) -> Self {
        Self::from(WeatherKind::from_wmo_code(code))
    }
}

impl From<WeatherKind> for Theme {
    fn from(kind: WeatherKind) -> Self {
        match kind {
            WeatherKind::Sunny => Self::Sunny,
            WeatherKind::Cloudy | WeatherKind::Fog => Self::Cloudy,
            WeatherKind::Rain | WeatherKind::Thunderstorm => Self::Rainy,
            WeatherKind::Snow => Self::Snowy,
        }
    }
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn describe_wmo_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
