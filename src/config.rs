//! Configuration management for `WeatherPro`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherProError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `WeatherPro` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherProConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Forecast cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Base URL for the geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Base URL for the reverse geocoding endpoint
    #[serde(default = "default_reverse_geocoding_url")]
    pub reverse_geocoding_url: String,
    /// Base URL for the IP locate endpoint
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Automatic retries for failed requests
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// Number of forecast days to request
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// Forecast cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Freshness window in minutes before a repeat fetch for the same key
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
    /// Directory holding the persistent favorites store
    #[serde(default = "default_store_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// City looked up when none is given
    #[serde(default = "default_city")]
    pub city: String,
    /// Display temperatures in Fahrenheit instead of Celsius
    #[serde(default)]
    pub fahrenheit: bool,
    /// Permit approximate IP-based geolocation
    #[serde(default = "default_allow_ip_lookup")]
    pub allow_ip_lookup: bool,
}

// Default value functions
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_reverse_geocoding_url() -> String {
    "https://api.bigdatacloud.net/data/reverse-geocode-client".to_string()
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_weather_max_retries() -> u32 {
    1
}

fn default_forecast_days() -> u32 {
    7
}

fn default_cache_ttl() -> u32 {
    5
}

fn default_store_location() -> String {
    "~/.cache/weatherpro".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_city() -> String {
    "Tehran".to_string()
}

fn default_allow_ip_lookup() -> bool {
    true
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocoding_url: default_geocoding_url(),
            reverse_geocoding_url: default_reverse_geocoding_url(),
            ip_lookup_url: default_ip_lookup_url(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl(),
            location: default_store_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            fahrenheit: false,
            allow_ip_lookup: default_allow_ip_lookup(),
        }
    }
}

impl WeatherProConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with WEATHERPRO_ prefix
        builder = builder.add_source(
            Environment::with_prefix("WEATHERPRO")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherProConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherpro").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.forecast_url.is_empty() {
            self.weather.forecast_url = default_forecast_url();
        }
        if self.weather.geocoding_url.is_empty() {
            self.weather.geocoding_url = default_geocoding_url();
        }
        if self.weather.reverse_geocoding_url.is_empty() {
            self.weather.reverse_geocoding_url = default_reverse_geocoding_url();
        }
        if self.weather.ip_lookup_url.is_empty() {
            self.weather.ip_lookup_url = default_ip_lookup_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.forecast_days == 0 {
            self.weather.forecast_days = default_forecast_days();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_store_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.city.is_empty() {
            self.defaults.city = default_city();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                WeatherProError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(
                WeatherProError::config("Weather API max retries cannot exceed 10").into(),
            );
        }

        if self.weather.forecast_days > 16 {
            return Err(WeatherProError::config("Forecast days cannot exceed 16").into());
        }

        if self.cache.ttl_minutes > 1440 {
            return Err(
                WeatherProError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherProError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherProError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [
            &self.weather.forecast_url,
            &self.weather.geocoding_url,
            &self.weather.reverse_geocoding_url,
            &self.weather.ip_lookup_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherProError::config(format!(
                    "API base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Create configuration directory if it doesn't exist
    pub fn ensure_config_dir() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let weatherpro_config_dir = config_dir.join("weatherpro");
            std::fs::create_dir_all(&weatherpro_config_dir).with_context(|| {
                format!(
                    "Failed to create config directory: {}",
                    weatherpro_config_dir.display()
                )
            })?;
            Ok(weatherpro_config_dir)
        } else {
            Err(WeatherProError::config("Unable to determine config directory").into())
        }
    }

    /// Resolve the persistent store directory, expanding a leading `~/`
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        let location = &self.cache.location;
        if let Some(rest) = location.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WeatherProConfig::default();
        assert_eq!(
            config.weather.forecast_url,
            "https://api.open-meteo.com/v1/forecast"
        );
        assert_eq!(
            config.weather.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1/search"
        );
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.weather.max_retries, 1);
        assert_eq!(config.weather.forecast_days, 7);
        assert_eq!(config.cache.ttl_minutes, 5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.city, "Tehran");
        assert!(config.defaults.allow_ip_lookup);
        assert!(!config.defaults.fahrenheit);
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherProConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeatherProConfig::default();
        config.weather.timeout_seconds = 500; // Invalid - too high
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("timeout cannot exceed")
        );
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = WeatherProConfig::default();
        config.weather.geocoding_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_fields() {
        let mut config = WeatherProConfig::default();
        config.weather.forecast_url = String::new();
        config.cache.ttl_minutes = 0;
        config.apply_defaults();
        assert_eq!(
            config.weather.forecast_url,
            "https://api.open-meteo.com/v1/forecast"
        );
        assert_eq!(config.cache.ttl_minutes, 5);
    }

    #[test]
    fn test_config_path_generation() {
        let path = WeatherProConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("weatherpro"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_store_path_expands_tilde() {
        let config = WeatherProConfig::default();
        let path = config.store_path();
        assert!(path.to_string_lossy().contains("weatherpro"));
        if dirs::home_dir().is_some() {
            assert!(!path.to_string_lossy().starts_with("~/"));
        }
    }
}
