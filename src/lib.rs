//! `WeatherPro` - weather lookup with geocoding, forecasts, and favorites
//!
//! This library provides the core functionality for resolving city names
//! (or the device position) to coordinates, fetching Open-Meteo forecast
//! data, classifying WMO weather codes, and keeping a persisted favorites
//! list.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod geolocate;
pub mod models;
pub mod resolver;
pub mod units;
pub mod web;

// Re-export core types for public API
pub use cache::{ForecastCache, QueryKey};
pub use client::{FALLBACK_PLACE_NAME, WeatherApiClient};
pub use config::WeatherProConfig;
pub use error::WeatherProError;
pub use favorites::{FavoritesBackend, FavoritesStore, FjallBackend, MemoryBackend};
pub use forecast::ForecastService;
pub use geolocate::{GeolocationError, IpLocator, LocationSource};
pub use models::{
    Coordinates, LocationMatch, ResolvedWeather, Theme, WeatherKind, WeatherSnapshot,
};
pub use resolver::{LocationResolver, select_best_match};
pub use units::{TemperatureUnit, display_temp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherProError>;
