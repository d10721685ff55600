//! JSON API over the forecast service
//!
//! The routes mirror what the single-page client consumes: one weather
//! lookup endpoint keyed by city or coordinates, and the favorites list.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::WeatherProError;
use crate::forecast::ForecastService;
use crate::models::{Coordinates, ResolvedWeather, Theme, WeatherKind, describe_wmo_code};
use crate::units::{TemperatureUnit, display_temp};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<ForecastService>>,
}

impl AppState {
    /// Wrap a service for sharing across handlers
    #[must_use]
    pub fn new(service: ForecastService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }
}

/// Weather lookup query: a city name or a coordinate pair
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub unit: Option<TemperatureUnit>,
}

/// Weather lookup response
#[derive(Debug, Serialize)]
pub struct ApiWeather {
    pub city: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub unit: TemperatureUnit,
    pub temperature: i32,
    pub apparent_temperature: i32,
    pub humidity: f64,
    pub wind_speed: f64,
    pub is_day: u8,
    pub weather_code: u16,
    pub description: String,
    pub kind: WeatherKind,
    pub theme: Theme,
    pub icon: String,
    pub is_favorite: bool,
    pub hourly: Vec<ApiHour>,
    pub daily: Vec<ApiDay>,
}

/// One hourly outlook entry
#[derive(Debug, Serialize)]
pub struct ApiHour {
    pub label: String,
    pub temperature: i32,
    pub weather_code: u16,
    pub icon: String,
}

/// One daily forecast entry
#[derive(Debug, Serialize)]
pub struct ApiDay {
    pub date: String,
    pub label: String,
    pub high: i32,
    pub low: i32,
    pub weather_code: u16,
    pub icon: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub name: String,
    pub is_favorite: bool,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/favorites", get(get_favorites))
        .route("/favorites/toggle", post(toggle_favorite))
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<ApiWeather>, (StatusCode, String)> {
    let mut service = state.service.lock().await;

    let resolved = match (query.lat, query.lon, &query.city) {
        (Some(lat), Some(lon), _) => service
            .lookup_coordinates(Coordinates::new(lat, lon))
            .await
            .map_err(error_response)?,
        (_, _, Some(city)) => service.lookup_city(city).await.map_err(error_response)?,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Provide either ?city= or ?lat=&lon=".to_string(),
            ));
        }
    };

    let unit = query.unit.unwrap_or(service.unit());
    let hourly = service.hourly_outlook();
    let is_favorite = service.favorites().is_favorite(&resolved.location.name);

    Ok(Json(render_weather(&resolved, unit, hourly, is_favorite)))
}

async fn get_favorites(State(state): State<AppState>) -> Json<Vec<String>> {
    let service = state.service.lock().await;
    Json(service.favorites().names().to_vec())
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, (StatusCode, String)> {
    let mut service = state.service.lock().await;
    let is_favorite = service
        .favorites_mut()
        .toggle(&payload.name)
        .map_err(error_response)?;
    Ok(Json(ToggleResponse {
        name: payload.name,
        is_favorite,
    }))
}

/// Render a resolved lookup into the response shape
fn render_weather(
    resolved: &ResolvedWeather,
    unit: TemperatureUnit,
    hourly: Vec<crate::models::HourlyEntry>,
    is_favorite: bool,
) -> ApiWeather {
    let current = &resolved.snapshot.current;
    let kind = WeatherKind::from_wmo_code(current.weather_code);

    ApiWeather {
        city: resolved.location.name.clone(),
        country: resolved.location.country.clone(),
        latitude: resolved.location.latitude,
        longitude: resolved.location.longitude,
        unit,
        temperature: display_temp(current.temperature_2m, unit),
        apparent_temperature: display_temp(current.apparent_temperature, unit),
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        is_day: current.is_day,
        weather_code: current.weather_code,
        description: describe_wmo_code(current.weather_code).to_string(),
        kind,
        theme: Theme::from_wmo_code(current.weather_code),
        icon: kind.icon_name().to_string(),
        is_favorite,
        hourly: hourly
            .into_iter()
            .map(|entry| {
                let kind = WeatherKind::from_wmo_code(entry.weather_code);
                ApiHour {
                    label: entry.hour_label(),
                    temperature: display_temp(entry.temperature_2m, unit),
                    weather_code: entry.weather_code,
                    icon: kind.icon_name().to_string(),
                }
            })
            .collect(),
        daily: resolved
            .snapshot
            .daily
            .days()
            .into_iter()
            .map(|day| {
                let kind = WeatherKind::from_wmo_code(day.weather_code);
                ApiDay {
                    label: day.day_label(),
                    high: display_temp(day.temperature_2m_max, unit),
                    low: display_temp(day.temperature_2m_min, unit),
                    weather_code: day.weather_code,
                    icon: kind.icon_name().to_string(),
                    sunrise: day.sunrise.clone(),
                    sunset: day.sunset.clone(),
                    date: day.time,
                }
            })
            .collect(),
    }
}

/// Map service errors onto HTTP responses with user-facing messages
fn error_response(err: anyhow::Error) -> (StatusCode, String) {
    match err.downcast_ref::<WeatherProError>() {
        Some(e @ WeatherProError::NotFound { .. }) => (StatusCode::NOT_FOUND, e.user_message()),
        Some(e @ WeatherProError::Validation { .. }) => (StatusCode::BAD_REQUEST, e.user_message()),
        Some(e) => (StatusCode::BAD_GATEWAY, e.user_message()),
        None => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CurrentConditions, DailySeries, HourlySeries, LocationMatch, WeatherSnapshot,
    };

    fn resolved() -> ResolvedWeather {
        ResolvedWeather {
            location: LocationMatch {
                name: "Tehran".to_string(),
                latitude: 35.69,
                longitude: 51.39,
                country: Some("Iran".to_string()),
                population: Some(7_153_309),
            },
            snapshot: WeatherSnapshot {
                current: CurrentConditions {
                    temperature_2m: 20.4,
                    relative_humidity_2m: 31.0,
                    apparent_temperature: 19.2,
                    is_day: 1,
                    precipitation: 0.0,
                    weather_code: 95,
                    wind_speed_10m: 11.5,
                },
                hourly: HourlySeries::default(),
                daily: DailySeries {
                    time: vec!["2024-06-03".to_string()],
                    weather_code: vec![45],
                    temperature_2m_max: vec![24.6],
                    temperature_2m_min: vec![13.5],
                    sunrise: vec!["2024-06-03T05:48".to_string()],
                    sunset: vec!["2024-06-03T20:19".to_string()],
                },
            },
        }
    }

    #[test]
    fn test_render_weather_derives_kind_and_theme() {
        let rendered = render_weather(&resolved(), TemperatureUnit::Celsius, Vec::new(), true);
        assert_eq!(rendered.temperature, 20);
        assert_eq!(rendered.kind, WeatherKind::Thunderstorm);
        assert_eq!(rendered.theme, Theme::Rainy);
        assert_eq!(rendered.icon, "lightning");
        assert!(rendered.is_favorite);
        assert_eq!(rendered.daily.len(), 1);
        assert_eq!(rendered.daily[0].high, 25);
        assert_eq!(rendered.daily[0].icon, "fog");
    }

    #[test]
    fn test_render_weather_fahrenheit() {
        let rendered = render_weather(&resolved(), TemperatureUnit::Fahrenheit, Vec::new(), false);
        assert_eq!(rendered.temperature, 69);
        assert_eq!(rendered.daily[0].low, 56);
    }

    #[test]
    fn test_error_response_maps_not_found() {
        let err: anyhow::Error = WeatherProError::not_found("Atlantis").into();
        let (status, message) = error_response(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(message.contains("Atlantis"));
    }
}
