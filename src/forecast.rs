//! Forecast service: the application root owning the query lifecycle
//!
//! Wires the API client, the forecast cache, and the favorites store behind
//! the operations the outer surfaces (CLI, HTTP) call. A single query is
//! outstanding at a time: each lookup takes a generation ticket and only a
//! result whose ticket is still current is committed, so a newer query
//! supersedes an older in-flight one and at most one in-flight result is
//! consumed per key. Stale committed data survives a failed refresh.

use std::time::Duration;

use anyhow::Result;
use chrono::{Local, Timelike};
use tracing::{debug, info};

use crate::WeatherProError;
use crate::cache::{ForecastCache, QueryKey};
use crate::client::WeatherApiClient;
use crate::config::WeatherProConfig;
use crate::favorites::{FavoritesBackend, FavoritesStore};
use crate::geolocate::LocationSource;
use crate::models::weather::WINDOW_HOURS;
use crate::models::{Coordinates, HourlyEntry, ResolvedWeather};
use crate::resolver::LocationResolver;
use crate::units::TemperatureUnit;

/// Application root for weather queries
pub struct ForecastService {
    client: WeatherApiClient,
    cache: ForecastCache,
    favorites: FavoritesStore,
    unit: TemperatureUnit,
    generation: u64,
    current: Option<ResolvedWeather>,
}

impl ForecastService {
    /// Build the service from config and a favorites persistence port
    pub fn new(config: &WeatherProConfig, backend: Box<dyn FavoritesBackend>) -> Result<Self> {
        let client = WeatherApiClient::new(config)?;
        let ttl = Duration::from_secs(u64::from(config.cache.ttl_minutes) * 60);
        let unit = if config.defaults.fahrenheit {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        };

        Ok(Self {
            client,
            cache: ForecastCache::new(ttl),
            favorites: FavoritesStore::new(backend),
            unit,
            generation: 0,
            current: None,
        })
    }

    /// Look up weather for a city name
    pub async fn lookup_city(&mut self, name: &str) -> Result<ResolvedWeather> {
        let key = QueryKey::city(name);
        if let Some(hit) = self.cache.fresh(&key) {
            self.current = Some(hit.clone());
            return Ok(hit);
        }

        let ticket = self.begin_query();
        let location = LocationResolver::resolve_city(&self.client, name).await?;
        let snapshot = self
            .client
            .fetch_forecast(location.latitude, location.longitude)
            .await?;

        self.commit(ticket, key, ResolvedWeather { location, snapshot })
    }

    /// Look up weather for a coordinate pair
    pub async fn lookup_coordinates(&mut self, coords: Coordinates) -> Result<ResolvedWeather> {
        let key = QueryKey::coords(coords);
        if let Some(hit) = self.cache.fresh(&key) {
            self.current = Some(hit.clone());
            return Ok(hit);
        }

        let ticket = self.begin_query();
        let location = LocationResolver::resolve_coordinates(&self.client, coords).await;
        let snapshot = self
            .client
            .fetch_forecast(location.latitude, location.longitude)
            .await?;

        self.commit(ticket, key, ResolvedWeather { location, snapshot })
    }

    /// Resolve the device position and look up weather there
    pub async fn locate(&mut self, source: &dyn LocationSource) -> Result<ResolvedWeather> {
        let coords = source
            .current_location()
            .await
            .map_err(|e| WeatherProError::general(e.to_string()))?;
        info!("Device located at {}", coords.format());
        self.lookup_coordinates(coords).await
    }

    /// Take a ticket for a new query, superseding any in-flight one
    fn begin_query(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Commit a fetched result if its ticket is still current
    fn commit(
        &mut self,
        ticket: u64,
        key: QueryKey,
        resolved: ResolvedWeather,
    ) -> Result<ResolvedWeather> {
        if ticket != self.generation {
            debug!("Discarding superseded result for {:?}", key);
            return Err(WeatherProError::general("Superseded by a newer query").into());
        }
        self.cache.insert(key, resolved.clone());
        self.current = Some(resolved.clone());
        Ok(resolved)
    }

    /// Last committed result, surviving failed refreshes
    #[must_use]
    pub fn current(&self) -> Option<&ResolvedWeather> {
        self.current.as_ref()
    }

    /// Rolling hourly window starting at the given wall-clock hour
    #[must_use]
    pub fn outlook_at(&self, hour: usize) -> Vec<HourlyEntry> {
        self.current
            .as_ref()
            .map(|resolved| resolved.snapshot.hourly.window_from(hour, WINDOW_HOURS))
            .unwrap_or_default()
    }

    /// Rolling hourly window starting at the current local hour
    #[must_use]
    pub fn hourly_outlook(&self) -> Vec<HourlyEntry> {
        self.outlook_at(Local::now().hour() as usize)
    }

    /// Toggle the currently shown location in the favorites list.
    ///
    /// No-op without a committed lookup; returns the city name and its new
    /// membership otherwise.
    pub fn toggle_current_favorite(&mut self) -> Result<Option<(String, bool)>> {
        let Some(resolved) = &self.current else {
            return Ok(None);
        };
        let name = resolved.location.name.clone();
        let now_favorite = self.favorites.toggle(&name)?;
        Ok(Some((name, now_favorite)))
    }

    /// Favorites list, read-only
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Favorites list, for direct mutation by the outer surfaces
    pub fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    /// Current display unit
    #[must_use]
    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Switch the display unit
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryBackend;

    fn service() -> ForecastService {
        let config = WeatherProConfig::default();
        ForecastService::new(&config, Box::new(MemoryBackend::new())).unwrap()
    }

    #[test]
    fn test_unit_defaults_to_celsius_and_toggles() {
        let mut service = service();
        assert_eq!(service.unit(), TemperatureUnit::Celsius);
        service.set_unit(TemperatureUnit::Fahrenheit);
        assert_eq!(service.unit(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_fahrenheit_config_default() {
        let mut config = WeatherProConfig::default();
        config.defaults.fahrenheit = true;
        let service = ForecastService::new(&config, Box::new(MemoryBackend::new())).unwrap();
        assert_eq!(service.unit(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_toggle_favorite_without_lookup_is_noop() {
        let mut service = service();
        assert!(service.toggle_current_favorite().unwrap().is_none());
        assert!(service.favorites().names().is_empty());
    }

    #[test]
    fn test_outlook_empty_without_lookup() {
        let service = service();
        assert!(service.outlook_at(12).is_empty());
        assert!(service.current().is_none());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut service = service();
        let old_ticket = service.begin_query();
        let _newer = service.begin_query();

        let result = service.commit(
            old_ticket,
            QueryKey::city("tehran"),
            sample::resolved("Tehran"),
        );
        assert!(result.is_err());
        assert!(service.current().is_none());

        let current_ticket = service.generation;
        let committed = service.commit(
            current_ticket,
            QueryKey::city("berlin"),
            sample::resolved("Berlin"),
        );
        assert!(committed.is_ok());
        assert_eq!(service.current().unwrap().location.name, "Berlin");
    }

    mod sample {
        use crate::models::{
            CurrentConditions, DailySeries, HourlySeries, LocationMatch, ResolvedWeather,
            WeatherSnapshot,
        };

        pub fn resolved(name: &str) -> ResolvedWeather {
            ResolvedWeather {
                location: LocationMatch {
                    name: name.to_string(),
                    latitude: 0.0,
                    longitude: 0.0,
                    country: None,
                    population: None,
                },
                snapshot: WeatherSnapshot {
                    current: CurrentConditions {
                        temperature_2m: 20.0,
                        relative_humidity_2m: 50.0,
                        apparent_temperature: 19.0,
                        is_day: 1,
                        precipitation: 0.0,
                        weather_code: 0,
                        wind_speed_10m: 5.0,
                    },
                    hourly: HourlySeries::default(),
                    daily: DailySeries::default(),
                },
            }
        }
    }
}
