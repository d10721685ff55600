//! Device geolocation port
//!
//! Geolocation is modeled as an asynchronous operation returning coordinates
//! or a typed failure, consumed through the same await contract as the
//! forecast fetch. The production implementation resolves an approximate
//! position from the caller's public IP and is permission-gated by the
//! `defaults.allow_ip_lookup` config flag.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::WeatherProConfig;
use crate::models::Coordinates;

/// Typed geolocation failure
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeolocationError {
    /// Lookup was not permitted
    #[error("Location permission denied")]
    PermissionDenied,
    /// No location service could be reached
    #[error("Location service unavailable")]
    Unavailable,
    /// Lookup timed out
    #[error("Location request timed out")]
    Timeout,
}

/// Source of the device's current position
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Resolve the current position
    async fn current_location(&self) -> Result<Coordinates, GeolocationError>;
}

/// Approximate geolocation from the caller's public IP
pub struct IpLocator {
    http: reqwest::Client,
    url: String,
    allowed: bool,
}

impl IpLocator {
    /// Create a locator from the application config
    pub fn new(config: &WeatherProConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .user_agent(concat!("weatherpro/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create geolocation client")?;

        Ok(Self {
            http,
            url: config.weather.ip_lookup_url.clone(),
            allowed: config.defaults.allow_ip_lookup,
        })
    }
}

#[async_trait]
impl LocationSource for IpLocator {
    async fn current_location(&self) -> Result<Coordinates, GeolocationError> {
        if !self.allowed {
            debug!("IP lookup disabled by configuration");
            return Err(GeolocationError::PermissionDenied);
        }

        let response = self.http.get(&self.url).send().await.map_err(|e| {
            debug!("IP locate request failed: {}", e);
            if e.is_timeout() {
                GeolocationError::Timeout
            } else {
                GeolocationError::Unavailable
            }
        })?;

        if !response.status().is_success() {
            debug!("IP locate returned status {}", response.status());
            return Err(GeolocationError::Unavailable);
        }

        let body: IpApiResponse = response.json().await.map_err(|e| {
            debug!("IP locate parse error: {}", e);
            GeolocationError::Unavailable
        })?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                let coords = Coordinates::new(lat, lon);
                info!("IP locate resolved to {}", coords.format());
                Ok(coords)
            }
            _ => Err(GeolocationError::Unavailable),
        }
    }
}

/// ip-api.com response fields of interest
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}
