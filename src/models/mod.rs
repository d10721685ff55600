//! Data models for the WeatherPro application
//!
//! This module contains the core domain models organized by concern:
//! - Location: geocoding matches and coordinate pairs
//! - Weather: forecast snapshot with parallel hourly/daily series
//! - Conditions: WMO weather-code classification, theme, and icon selection

pub mod conditions;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use conditions::{Theme, WeatherKind, describe_wmo_code};
pub use location::{Coordinates, LocationMatch};
pub use weather::{
    CurrentConditions, DailyEntry, DailySeries, HourlyEntry, HourlySeries, ResolvedWeather,
    WeatherSnapshot,
};
