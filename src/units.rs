//! Temperature unit preference and display conversion

use serde::{Deserialize, Serialize};

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Convert a Celsius value to the rounded display value for the given unit.
///
/// Rounding is `f64::round` (round-to-nearest, halves away from zero) and is
/// applied identically to current, hourly, and daily temperatures.
#[must_use]
pub fn display_temp(celsius: f64, unit: TemperatureUnit) -> i32 {
    match unit {
        TemperatureUnit::Celsius => celsius.round() as i32,
        TemperatureUnit::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round() as i32,
    }
}
