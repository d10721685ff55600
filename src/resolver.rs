//! Location resolution
//!
//! Resolves free-text city names to a single best-matching location via the
//! geocoding search, and coordinates to a human-readable place name via the
//! reverse geocoder.

use anyhow::Result;
use tracing::debug;

use crate::WeatherProError;
use crate::client::WeatherApiClient;
use crate::models::{Coordinates, LocationMatch};

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a city name to its best-matching location.
    ///
    /// Prefers an exact case-insensitive name match; otherwise picks the
    /// candidate with the highest population, treating a missing population
    /// as 0. Ties resolve to the first candidate in upstream order.
    pub async fn resolve_city(client: &WeatherApiClient, name: &str) -> Result<LocationMatch> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WeatherProError::validation("City name cannot be empty").into());
        }

        let candidates = client.geocode(name).await?;
        let best = select_best_match(name, &candidates)
            .ok_or_else(|| WeatherProError::not_found(name))?;

        debug!(
            "Resolved '{}' to {} ({:.4}, {:.4})",
            name, best.name, best.latitude, best.longitude
        );

        Ok(best.clone())
    }

    /// Resolve coordinates to a location with a proper name.
    ///
    /// Reverse geocoding failure never propagates; the returned match then
    /// carries the placeholder name with the original coordinates intact.
    pub async fn resolve_coordinates(
        client: &WeatherApiClient,
        coords: Coordinates,
    ) -> LocationMatch {
        let name = client
            .reverse_geocode(coords.latitude, coords.longitude)
            .await;
        debug!("Resolved ({}) to '{}'", coords.format(), name);
        LocationMatch::from_coordinates(coords, name)
    }
}

/// Best-match selection over geocoding candidates
#[must_use]
pub fn select_best_match<'a>(
    query: &str,
    candidates: &'a [LocationMatch],
) -> Option<&'a LocationMatch> {
    if let Some(exact) = candidates
        .iter()
        .find(|candidate| candidate.name.eq_ignore_ascii_case(query))
    {
        return Some(exact);
    }

    // Largest city wins; a strict comparison keeps the first on ties
    let mut best = candidates.first()?;
    for candidate in &candidates[1..] {
        if candidate.population.unwrap_or(0) > best.population.unwrap_or(0) {
            best = candidate;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, population: Option<u64>) -> LocationMatch {
        LocationMatch {
            name: name.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country: None,
            population,
        }
    }

    #[test]
    fn test_exact_match_wins_regardless_of_population() {
        let candidates = vec![
            candidate("Springfield Metro", Some(9_000_000)),
            candidate("springfield", Some(100)),
        ];
        let best = select_best_match("Springfield", &candidates).unwrap();
        assert_eq!(best.name, "springfield");
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let candidates = vec![candidate("TEHRAN", Some(7_000_000))];
        let best = select_best_match("tehran", &candidates).unwrap();
        assert_eq!(best.name, "TEHRAN");
    }

    #[test]
    fn test_largest_population_without_exact_match() {
        let candidates = vec![
            candidate("Paris, Texas", Some(24_000)),
            candidate("Paris Hill", Some(1_000_000)),
            candidate("Pariz", None),
        ];
        let best = select_best_match("Pariis", &candidates).unwrap();
        assert_eq!(best.name, "Paris Hill");
    }

    #[test]
    fn test_missing_population_treated_as_zero() {
        let candidates = vec![candidate("A", None), candidate("B", Some(1))];
        let best = select_best_match("C", &candidates).unwrap();
        assert_eq!(best.name, "B");
    }

    #[test]
    fn test_population_ties_resolve_to_first_upstream() {
        let candidates = vec![
            candidate("First", Some(500)),
            candidate("Second", Some(500)),
            candidate("Third", None),
        ];
        let best = select_best_match("nomatch", &candidates).unwrap();
        assert_eq!(best.name, "First");

        let all_missing = vec![candidate("Alpha", None), candidate("Beta", None)];
        let best = select_best_match("nomatch", &all_missing).unwrap();
        assert_eq!(best.name, "Alpha");
    }

    #[test]
    fn test_no_candidates_yields_none() {
        assert!(select_best_match("anything", &[]).is_none());
    }
}
