/// Test fixtures: representative JSON payloads from the Open-Meteo APIs.
///
/// These are structurally complete responses trimmed of the fields the
/// service never reads (`generationtime_ms`, `elevation`, and so on).
///
/// Forecast response shape:
///   response.latitude / .longitude     - grid cell actually used
///   response.daily_units               - unit per variable (ignored)
///   response.daily.time[]              - ISO dates, one per day
///   response.daily.<variable>[]        - one number (or null) per day
///
/// Flood response shape is identical, with `river_discharge` and
/// `river_discharge_max` (m³/s) as the daily variables.
///
/// Error responses are `{ "error": true, "reason": "..." }` with a 400.

/// Gulf coast, late August: a tropical system passes mid-period.
/// Gusts peak at 96.5 km/h on day 6 with 100% precipitation probability;
/// mean max temperature is 30.1°C with 7 of 14 days dry.
#[cfg(test)]
pub(crate) fn fixture_gulf_coast_forecast_json() -> &'static str {
    r#"{
      "latitude": 29.947,
      "longitude": -90.07,
      "timezone": "America/Chicago",
      "daily_units": {
        "time": "iso8601",
        "temperature_2m_max": "°C",
        "temperature_2m_min": "°C",
        "precipitation_sum": "mm",
        "precipitation_probability_max": "%",
        "windspeed_10m_max": "km/h",
        "windgusts_10m_max": "km/h"
      },
      "daily": {
        "time": ["2025-08-25", "2025-08-26", "2025-08-27", "2025-08-28", "2025-08-29",
                 "2025-08-30", "2025-08-31", "2025-09-01", "2025-09-02", "2025-09-03",
                 "2025-09-04", "2025-09-05", "2025-09-06", "2025-09-07"],
        "temperature_2m_max": [29.8, 30.4, 31.2, 31.9, 30.6, 28.1, 27.5, 28.9, 29.7, 30.2, 31.0, 31.4, 30.8, 29.9],
        "temperature_2m_min": [23.1, 23.8, 24.4, 24.9, 24.0, 22.6, 22.1, 22.8, 23.0, 23.5, 24.2, 24.6, 24.1, 23.3],
        "precipitation_sum": [0.0, 0.2, 3.4, 12.8, 38.5, 61.2, 22.4, 4.1, 0.0, 0.0, 0.6, 1.8, 0.0, 0.3],
        "precipitation_probability_max": [35, 40, 65, 85, 95, 100, 90, 55, 20, 10, 15, 30, 10, 15],
        "windspeed_10m_max": [18.4, 21.7, 29.3, 41.8, 58.2, 63.9, 44.1, 27.6, 16.2, 14.8, 17.9, 20.3, 15.1, 16.6],
        "windgusts_10m_max": [32.1, 38.6, 51.4, 72.9, 88.3, 96.5, 77.2, 49.8, 29.4, 27.1, 31.8, 36.2, 28.0, 30.4]
      }
    }"#
}

/// Lower Mississippi discharge for the same period: peaks at 742.6 m³/s,
/// above the 500 m³/s high-flood threshold.
#[cfg(test)]
pub(crate) fn fixture_gulf_coast_flood_json() -> &'static str {
    r#"{
      "latitude": 29.95,
      "longitude": -90.05,
      "daily_units": { "time": "iso8601", "river_discharge": "m³/s", "river_discharge_max": "m³/s" },
      "daily": {
        "time": ["2025-08-25", "2025-08-26", "2025-08-27", "2025-08-28", "2025-08-29",
                 "2025-08-30", "2025-08-31", "2025-09-01", "2025-09-02", "2025-09-03",
                 "2025-09-04", "2025-09-05", "2025-09-06", "2025-09-07"],
        "river_discharge": [410.2, 418.7, 436.9, 482.3, 561.8, 688.4, 742.6, 731.0, 695.3, 640.8, 588.1, 542.7, 503.9, 471.2],
        "river_discharge_max": [455.0, 466.1, 489.4, 540.7, 633.2, 781.9, 850.3, 829.6, 780.0, 719.4, 655.8, 601.2, 556.0, 519.7]
      }
    }"#
}

/// Three-day forecast where the model has no value for day 2's high.
#[cfg(test)]
pub(crate) fn fixture_forecast_with_null_json() -> &'static str {
    r#"{
      "latitude": 51.5,
      "longitude": -0.12,
      "daily": {
        "time": ["2025-01-10", "2025-01-11", "2025-01-12"],
        "temperature_2m_max": [7.2, null, 6.8],
        "temperature_2m_min": [1.1, 0.4, -0.3],
        "precipitation_sum": [2.1, 0.0, 5.6],
        "precipitation_probability_max": [60, 10, 85],
        "windspeed_10m_max": [22.0, 14.5, 31.2],
        "windgusts_10m_max": [44.3, 25.0, 58.9]
      }
    }"#
}

/// Forecast requested without the wind variables.
#[cfg(test)]
pub(crate) fn fixture_forecast_without_wind_json() -> &'static str {
    r#"{
      "latitude": 51.5,
      "longitude": -0.12,
      "daily": {
        "time": ["2025-01-10", "2025-01-11"],
        "temperature_2m_max": [7.2, 8.0],
        "temperature_2m_min": [1.1, 0.4],
        "precipitation_sum": [2.1, 0.0],
        "precipitation_probability_max": [60, 10]
      }
    }"#
}

/// Error body returned with HTTP 400 for an out-of-range coordinate.
#[cfg(test)]
pub(crate) fn fixture_open_meteo_error_json() -> &'static str {
    r#"{
      "error": true,
      "reason": "Latitude must be in range of -90 to 90°. Given: 123.0."
    }"#
}
