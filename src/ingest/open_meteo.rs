/// Open-Meteo forecast and flood API client.
///
/// Handles URL construction, JSON response parsing, and blocking fetches
/// for the two upstream providers the risk engine depends on:
///   https://api.open-meteo.com/v1/forecast
///   https://flood-api.open-meteo.com/v1/flood
///
/// Both return a `daily` object of parallel arrays keyed by variable name,
/// which deserializes directly into `WeatherSeries` / `HydrologySeries`.
/// See `fixtures.rs` for annotated examples of the response structure.
///
/// Parsing does not judge the data. Missing variables, nulls and uneven
/// arrays pass through untouched for the analyzer to reject.

use crate::ingest::IngestError;
use crate::model::{
    Coordinate, HydrologySeries, WeatherSeries, FIELD_DISCHARGE, FIELD_DISCHARGE_MAX,
    FIELD_MAX_TEMP, FIELD_MIN_TEMP, FIELD_PRECIP_PROBABILITY, FIELD_PRECIP_SUM, FIELD_WIND_GUST,
    FIELD_WIND_SPEED, FORECAST_DAYS,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Serde structures for the response envelope
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    daily: Option<WeatherSeries>,
}

#[derive(Deserialize)]
struct FloodResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    daily: Option<HydrologySeries>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
const FLOOD_BASE_URL: &str = "https://flood-api.open-meteo.com/v1/flood";

/// Daily variables requested from the forecast API, in request order.
pub const WEATHER_VARIABLES: [&str; 6] = [
    FIELD_MAX_TEMP,
    FIELD_MIN_TEMP,
    FIELD_PRECIP_SUM,
    FIELD_PRECIP_PROBABILITY,
    FIELD_WIND_SPEED,
    FIELD_WIND_GUST,
];

/// Daily variables requested from the flood API.
pub const FLOOD_VARIABLES: [&str; 2] = [FIELD_DISCHARGE, FIELD_DISCHARGE_MAX];

/// Builds a forecast URL for the 14-day daily horizon at `coordinate`,
/// with timestamps in the location's own timezone.
///
/// # Example
/// ```
/// use climate_risk_service::ingest::open_meteo::build_forecast_url;
/// use climate_risk_service::model::Coordinate;
///
/// let url = build_forecast_url(Coordinate::new(29.95, -90.07).unwrap());
/// assert!(url.contains("forecast_days=14"));
/// ```
pub fn build_forecast_url(coordinate: Coordinate) -> String {
    format!(
        "{}?latitude={}&longitude={}&daily={}&timezone=auto&forecast_days={}",
        FORECAST_BASE_URL,
        coordinate.latitude,
        coordinate.longitude,
        WEATHER_VARIABLES.join(","),
        FORECAST_DAYS
    )
}

/// Builds a flood API URL for daily river discharge at `coordinate`.
///
/// The flood API snaps to the nearest modelled river cell, so its series
/// length is decided upstream and need not match the forecast.
pub fn build_flood_url(coordinate: Coordinate) -> String {
    format!(
        "{}?latitude={}&longitude={}&daily={}",
        FLOOD_BASE_URL,
        coordinate.latitude,
        coordinate.longitude,
        FLOOD_VARIABLES.join(",")
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a forecast response body into a `WeatherSeries`.
///
/// # Errors
/// - `IngestError::Api` - the body is an Open-Meteo error object.
/// - `IngestError::Parse` - malformed JSON, or no `daily` block.
pub fn parse_forecast_response(json: &str) -> Result<WeatherSeries, IngestError> {
    let response: ForecastResponse = serde_json::from_str(json)
        .map_err(|e| IngestError::Parse(format!("forecast JSON deserialization failed: {}", e)))?;

    if response.error {
        return Err(IngestError::Api(
            response.reason.unwrap_or_else(|| "unspecified forecast API error".to_string()),
        ));
    }

    response
        .daily
        .ok_or_else(|| IngestError::Parse("forecast response has no daily block".to_string()))
}

/// Parses a flood response body into a `HydrologySeries`.
///
/// # Errors
/// Same as `parse_forecast_response`.
pub fn parse_flood_response(json: &str) -> Result<HydrologySeries, IngestError> {
    let response: FloodResponse = serde_json::from_str(json)
        .map_err(|e| IngestError::Parse(format!("flood JSON deserialization failed: {}", e)))?;

    if response.error {
        return Err(IngestError::Api(
            response.reason.unwrap_or_else(|| "unspecified flood API error".to_string()),
        ));
    }

    response
        .daily
        .ok_or_else(|| IngestError::Parse("flood response has no daily block".to_string()))
}

// ---------------------------------------------------------------------------
// API client functions
// ---------------------------------------------------------------------------

/// Builds the blocking HTTP client shared by all fetches.
pub fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client, IngestError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

fn get_body(client: &reqwest::blocking::Client, url: &str) -> Result<String, IngestError> {
    debug!(url, "fetching");
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()?;

    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        // Open-Meteo explains 4xx failures in a JSON body; surface the reason.
        let reason = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(str::to_string))
            .unwrap_or(body);
        warn!(url, status = status.as_u16(), %reason, "upstream request failed");
        return Err(IngestError::Status {
            status: status.as_u16(),
            reason,
        });
    }

    Ok(body)
}

/// Fetches the 14-day daily forecast for `coordinate`.
pub fn fetch_weather(
    client: &reqwest::blocking::Client,
    coordinate: Coordinate,
) -> Result<WeatherSeries, IngestError> {
    let body = get_body(client, &build_forecast_url(coordinate))?;
    parse_forecast_response(&body)
}

/// Fetches daily river discharge for `coordinate`.
pub fn fetch_hydrology(
    client: &reqwest::blocking::Client,
    coordinate: Coordinate,
) -> Result<HydrologySeries, IngestError> {
    let body = get_body(client, &build_flood_url(coordinate))?;
    parse_flood_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
