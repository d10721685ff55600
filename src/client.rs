//! Weather API client for Open-Meteo integration
//!
//! Provides HTTP client functionality for the geocoding search, the forecast
//! endpoint, and the BigDataCloud reverse geocoder, with a transient-failure
//! retry policy and request timing logs. No API key is required by any of
//! the upstream services.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::{WeatherConfig, WeatherProConfig};
use crate::models::{LocationMatch, WeatherSnapshot};

/// Candidates requested from the geocoding search
const GEOCODING_COUNT: u32 = 10;

/// Place name used when reverse geocoding cannot name the coordinates
pub const FALLBACK_PLACE_NAME: &str = "Your Location";

/// Fields requested in the `current` block
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,weather_code,wind_speed_10m";

/// Fields requested in the `daily` block
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";

/// Fields requested in the `hourly` block
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";

/// HTTP client for the weather and geocoding endpoints
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    /// HTTP client with retry middleware
    http: ClientWithMiddleware,
    /// Weather section of the application config
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherProConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.weather.timeout_seconds.into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weatherpro/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.weather.max_retries);
        let http = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            config: config.weather.clone(),
        })
    }

    /// Search the geocoding endpoint for candidates matching `name`
    #[instrument(skip(self))]
    pub async fn geocode(&self, name: &str) -> Result<Vec<LocationMatch>> {
        info!("Geocoding location: '{}'", name);
        let start_time = Instant::now();

        let url = format!(
            "{}?name={}&count={}&language=en&format=json",
            self.config.geocoding_url,
            urlencoding::encode(name),
            GEOCODING_COUNT
        );
        debug!("Geocoding request URL: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request failed for '{name}'"))?
            .error_for_status()
            .with_context(|| format!("Geocoding request rejected for '{name}'"))?;

        let geocoding_response: GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        let candidates = geocoding_response.results.unwrap_or_default();
        if candidates.is_empty() {
            warn!("No geocoding results for '{}'", name);
        } else {
            info!(
                "Found {} geocoding results for '{}' in {:.3}s",
                candidates.len(),
                name,
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(candidates)
    }

    /// Fetch the current/hourly/daily forecast for coordinates
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        info!(
            "Fetching forecast for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let start_time = Instant::now();

        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&hourly={HOURLY_FIELDS}&timezone=auto&forecast_days={}",
            self.config.forecast_url, self.config.forecast_days
        );
        debug!("Forecast request URL: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "Forecast request failed")?
            .error_for_status()
            .with_context(|| "Forecast request rejected")?;

        let snapshot: WeatherSnapshot = response
            .json()
            .await
            .with_context(|| "Failed to parse forecast response")?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved forecast with {} hourly entries in {:.3}s",
            snapshot.hourly.aligned_len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow forecast API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(snapshot)
    }

    /// Name the place at the given coordinates.
    ///
    /// Falls back from `city` to `locality` to [`FALLBACK_PLACE_NAME`];
    /// failures of the upstream call are logged and substituted with the
    /// placeholder, never propagated.
    #[instrument(skip(self))]
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> String {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&localityLanguage=en",
            self.config.reverse_geocoding_url
        );
        debug!("Reverse geocoding request URL: {}", url);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Reverse geocode request failed: {}", e);
                return FALLBACK_PLACE_NAME.to_string();
            }
        };

        if !response.status().is_success() {
            debug!("Reverse geocode returned status {}", response.status());
            return FALLBACK_PLACE_NAME.to_string();
        }

        let body: ReverseGeocodeResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Reverse geocode parse error: {}", e);
                return FALLBACK_PLACE_NAME.to_string();
            }
        };

        // The upstream reports unknown fields as empty strings, not nulls
        let name = body
            .city
            .filter(|city| !city.is_empty())
            .or(body.locality.filter(|locality| !locality.is_empty()))
            .unwrap_or_else(|| FALLBACK_PLACE_NAME.to_string());

        info!("Reverse geocoded to: {}", name);
        name
    }
}

/// Geocoding search response envelope
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<LocationMatch>>,
}

/// Reverse geocoding response fields of interest
#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    city: Option<String>,
    locality: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_from_default_config() {
        let config = WeatherProConfig::default();
        assert!(WeatherApiClient::new(&config).is_ok());
    }

    #[test]
    fn test_geocoding_response_parses_missing_results() {
        let parsed: GeocodingResponse = serde_json::from_str("{\"generationtime_ms\":0.5}")
            .expect("envelope without results should parse");
        assert!(parsed.results.is_none());
    }

    #[test]
    fn test_geocoding_response_parses_candidates() {
        let body = r#"{"results":[
            {"name":"Tehran","latitude":35.69439,"longitude":51.42151,"country":"Iran","population":7153309},
            {"name":"Berlin","latitude":52.52437,"longitude":13.41053}
        ]}"#;
        let parsed: GeocodingResponse = serde_json::from_str(body).expect("candidates parse");
        let results = parsed.results.expect("results present");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].population, Some(7_153_309));
        assert!(results[1].population.is_none());
        assert!(results[1].country.is_none());
    }
}
