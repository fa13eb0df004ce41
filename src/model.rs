/// Shared data types for the climate risk service.
///
/// Series types mirror the `daily` objects returned by the Open-Meteo
/// forecast and flood APIs, so a response body deserializes straight into
/// them. Every series field is optional as received: an absent array is a
/// different failure from an empty one, and the analyzer reports each
/// distinctly. JSON `null` entries inside an array become `NaN` and are
/// rejected during validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Open-Meteo daily variable names
// ---------------------------------------------------------------------------

pub const FIELD_MAX_TEMP: &str = "temperature_2m_max";
pub const FIELD_MIN_TEMP: &str = "temperature_2m_min";
pub const FIELD_PRECIP_SUM: &str = "precipitation_sum";
pub const FIELD_PRECIP_PROBABILITY: &str = "precipitation_probability_max";
pub const FIELD_WIND_SPEED: &str = "windspeed_10m_max";
pub const FIELD_WIND_GUST: &str = "windgusts_10m_max";
pub const FIELD_DISCHARGE: &str = "river_discharge";
pub const FIELD_DISCHARGE_MAX: &str = "river_discharge_max";

/// Forecast horizon requested from the weather provider.
pub const FORECAST_DAYS: u32 = 14;

// ---------------------------------------------------------------------------
// Input series
// ---------------------------------------------------------------------------

/// Daily weather forecast for one location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WeatherSeries {
    #[serde(default)]
    pub time: Option<Vec<NaiveDate>>,
    #[serde(rename = "temperature_2m_max", default, deserialize_with = "nullable_series")]
    pub max_temp: Option<Vec<f64>>,
    #[serde(rename = "temperature_2m_min", default, deserialize_with = "nullable_series")]
    pub min_temp: Option<Vec<f64>>,
    #[serde(rename = "precipitation_sum", default, deserialize_with = "nullable_series")]
    pub precipitation_sum: Option<Vec<f64>>,
    #[serde(rename = "precipitation_probability_max", default, deserialize_with = "nullable_series")]
    pub precipitation_probability_max: Option<Vec<f64>>,
    #[serde(rename = "windspeed_10m_max", default, deserialize_with = "nullable_series")]
    pub wind_speed_max: Option<Vec<f64>>,
    #[serde(rename = "windgusts_10m_max", default, deserialize_with = "nullable_series")]
    pub wind_gust_max: Option<Vec<f64>>,
}

/// Daily river discharge (m³/s) for one location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HydrologySeries {
    #[serde(default)]
    pub time: Option<Vec<NaiveDate>>,
    #[serde(rename = "river_discharge", default, deserialize_with = "nullable_series")]
    pub discharge: Option<Vec<f64>>,
    #[serde(rename = "river_discharge_max", default, deserialize_with = "nullable_series")]
    pub discharge_max: Option<Vec<f64>>,
}

/// Open-Meteo emits `null` for days it has no value for. Those days are
/// carried as `NaN` so validation can name the offending index.
fn nullable_series<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|values| values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()))
}

// ---------------------------------------------------------------------------
// Hazard classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Flood,
    Wildfire,
    Wind,
    Drought,
    Storm,
}

impl HazardKind {
    pub const ALL: [HazardKind; 5] = [
        HazardKind::Flood,
        HazardKind::Wildfire,
        HazardKind::Wind,
        HazardKind::Drought,
        HazardKind::Storm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Flood => "flood",
            HazardKind::Wildfire => "wildfire",
            HazardKind::Wind => "wind",
            HazardKind::Drought => "drought",
            HazardKind::Storm => "storm",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal risk classification assigned per hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessment of a single hazard at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardAssessment {
    pub level: RiskLevel,
    /// Estimated probability, whole percent in 0..=100.
    pub probability: u8,
    /// Rationale citing the statistic that drove the classification.
    pub detail: String,
}

/// Hazard assessments keyed by kind. A `BTreeMap` keeps serialization order
/// stable (flood, wildfire, wind, drought, storm).
pub type HazardMap = BTreeMap<HazardKind, HazardAssessment>;

/// Complete risk picture for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(flatten)]
    pub hazards: HazardMap,
    pub premium_multiplier: Decimal,
}

impl RiskAssessment {
    pub fn hazard(&self, kind: HazardKind) -> Option<&HazardAssessment> {
        self.hazards.get(&kind)
    }

    pub fn level(&self, kind: HazardKind) -> Option<RiskLevel> {
        self.hazards.get(&kind).map(|a| a.level)
    }

    /// True if any hazard is classified High.
    pub fn has_high_hazard(&self) -> bool {
        self.hazards.values().any(|a| a.level == RiskLevel::High)
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// WGS84 coordinate of an insured property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Input validation failures raised by the hazard analyzer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// A required series is present but contains no values.
    #[error("insufficient data: {0} is empty")]
    InsufficientData(String),

    /// Non-finite values, or parallel arrays of differing length.
    #[error("malformed series: {0}")]
    MalformedSeries(String),

    /// A required series is absent from the input.
    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_series_deserializes_open_meteo_names() {
        let json = r#"{
            "time": ["2025-03-01", "2025-03-02"],
            "temperature_2m_max": [21.5, 23.0],
            "temperature_2m_min": [10.1, 11.4],
            "precipitation_sum": [0.0, 2.3],
            "precipitation_probability_max": [5, 60],
            "windspeed_10m_max": [14.2, 18.9],
            "windgusts_10m_max": [30.6, 41.0]
        }"#;
        let series: WeatherSeries = serde_json::from_str(json).expect("daily object should parse");

        assert_eq!(series.max_temp, Some(vec![21.5, 23.0]));
        assert_eq!(series.precipitation_probability_max, Some(vec![5.0, 60.0]));
        assert_eq!(series.time.as_ref().map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_absent_field_stays_none() {
        let json = r#"{ "temperature_2m_max": [21.5] }"#;
        let series: WeatherSeries = serde_json::from_str(json).expect("partial object should parse");
        assert!(series.wind_gust_max.is_none(), "absent array must not become empty");
        assert!(series.time.is_none());
    }

    #[test]
    fn test_null_entries_become_nan() {
        let json = r#"{ "river_discharge": [12.0, null, 14.5] }"#;
        let series: HydrologySeries = serde_json::from_str(json).expect("nulls should parse");
        let values = series.discharge.expect("discharge present");
        assert_eq!(values.len(), 3);
        assert!(values[1].is_nan(), "null should be carried as NaN");
    }

    #[test]
    fn test_hazard_kind_serializes_lowercase() {
        let json = serde_json::to_string(&HazardKind::Wildfire).unwrap();
        assert_eq!(json, "\"wildfire\"");
        assert_eq!(HazardKind::Storm.to_string(), "storm");
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_risk_assessment_serializes_flat() {
        let mut hazards = HazardMap::new();
        hazards.insert(
            HazardKind::Flood,
            HazardAssessment {
                level: RiskLevel::High,
                probability: 60,
                detail: "test".to_string(),
            },
        );
        let assessment = RiskAssessment {
            hazards,
            premium_multiplier: Decimal::new(15, 1),
        };

        let value = serde_json::to_value(&assessment).unwrap();
        assert_eq!(value["flood"]["level"], "High");
        assert_eq!(value["flood"]["probability"], 60);
        assert_eq!(value["premium_multiplier"], 1.5);
        assert!(assessment.has_high_hazard());
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(40.69, -89.59).is_ok());
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(CoordinateError::Latitude(91.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(CoordinateError::Longitude(-180.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }
}
