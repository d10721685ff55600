//! Location models: geocoding matches and coordinate pairs

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format coordinates as a display string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Round coordinates to micro-degree integers for cache key generation
    #[must_use]
    pub fn micro_degrees(&self) -> (i64, i64) {
        let lat = (self.latitude * 1_000_000.0).round() as i64;
        let lon = (self.longitude * 1_000_000.0).round() as i64;
        (lat, lon)
    }
}

/// Candidate returned by the geocoding search
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationMatch {
    /// Place name as reported upstream
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name, when the upstream provides one
    #[serde(default)]
    pub country: Option<String>,
    /// Resident population, when the upstream provides one
    #[serde(default)]
    pub population: Option<u64>,
}

impl LocationMatch {
    /// Create a match from bare coordinates and a display name
    #[must_use]
    pub fn from_coordinates(coords: Coordinates, name: String) -> Self {
        Self {
            name,
            latitude: coords.latitude,
            longitude: coords.longitude,
            country: None,
            population: None,
        }
    }

    /// Coordinate pair of this match
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
