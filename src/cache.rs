//! In-memory forecast cache keyed by query
//!
//! One entry per query key with a freshness window; a fresh entry is served
//! without a network call, an expired entry is dropped on access. The cache
//! is owned by the application root and passed by reference, never held as
//! global state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::{Coordinates, ResolvedWeather};

/// Identity of a distinct weather query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Lookup by city name, normalized to lowercase
    City(String),
    /// Lookup by coordinates at micro-degree precision
    Coords { lat_micro: i64, lon_micro: i64 },
}

impl QueryKey {
    /// Key for a city-name query
    #[must_use]
    pub fn city(name: &str) -> Self {
        Self::City(name.trim().to_lowercase())
    }

    /// Key for a coordinate query
    #[must_use]
    pub fn coords(coords: Coordinates) -> Self {
        let (lat_micro, lon_micro) = coords.micro_degrees();
        Self::Coords {
            lat_micro,
            lon_micro,
        }
    }
}

/// Cached entry with its storage time
#[derive(Debug, Clone)]
struct CachedEntry {
    value: ResolvedWeather,
    stored_at: Instant,
}

/// Forecast cache with a fixed freshness window
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: HashMap<QueryKey, CachedEntry>,
}

impl ForecastCache {
    /// Create a cache with the given freshness window
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Get a fresh entry for the key, dropping it if expired
    pub fn fresh(&mut self, key: &QueryKey) -> Option<ResolvedWeather> {
        match self.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("Cache hit for {:?}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry expired for {:?}", key);
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value for the key, replacing any previous entry
    pub fn insert(&mut self, key: QueryKey, value: ResolvedWeather) {
        self.entries.insert(
            key,
            CachedEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, fresh or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
