/// Multi-hazard risk scoring.
///
/// `HazardAnalyzer::assess` turns a 14-day weather forecast and a river
/// discharge series into five independent hazard assessments. Each hazard
/// reduces its inputs to one continuous risk factor, buckets that factor
/// into Low / Medium / High using the thresholds in `config::HazardThresholds`,
/// and derives a whole-percent probability capped per tier.
///
/// Input validation is strict. A missing array, an empty array, parallel
/// weather arrays of different lengths, or a non-finite value all fail the
/// whole assessment; no defaults are substituted.
///
/// All threshold comparisons are strict (`>`). Rounding is half away from
/// zero, applied before the tier cap.

use crate::config::HazardThresholds;
use crate::model::{
    AssessmentError, HazardAssessment, HazardKind, HazardMap, HydrologySeries, RiskLevel,
    WeatherSeries, FIELD_DISCHARGE, FIELD_DISCHARGE_MAX, FIELD_MAX_TEMP, FIELD_MIN_TEMP,
    FIELD_PRECIP_PROBABILITY, FIELD_PRECIP_SUM, FIELD_WIND_GUST, FIELD_WIND_SPEED,
};

// ---------------------------------------------------------------------------
// Probability caps
// ---------------------------------------------------------------------------

/// Upper bound on the reported probability for each tier.
#[derive(Debug, Clone, Copy)]
struct TierCaps {
    high: f64,
    medium: f64,
    low: f64,
}

impl TierCaps {
    fn for_level(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }
}

const FLOOD_CAPS: TierCaps = TierCaps { high: 90.0, medium: 70.0, low: 30.0 };
const WILDFIRE_CAPS: TierCaps = TierCaps { high: 90.0, medium: 60.0, low: 30.0 };
const WIND_CAPS: TierCaps = TierCaps { high: 80.0, medium: 60.0, low: 30.0 };
const DROUGHT_CAPS: TierCaps = TierCaps { high: 90.0, medium: 70.0, low: 30.0 };
const STORM_CAPS: TierCaps = TierCaps { high: 90.0, medium: 60.0, low: 30.0 };

/// Low drought risk never reports below this probability.
const DROUGHT_LOW_FLOOR: f64 = 10.0;

// ---------------------------------------------------------------------------
// Validated input views
// ---------------------------------------------------------------------------

struct WeatherView<'a> {
    max_temp: &'a [f64],
    precipitation_sum: &'a [f64],
    precipitation_probability: &'a [f64],
    wind_speed: &'a [f64],
    wind_gust: &'a [f64],
}

struct HydrologyView<'a> {
    discharge: &'a [f64],
}

fn require<'a>(series: &'a Option<Vec<f64>>, field: &str) -> Result<&'a [f64], AssessmentError> {
    series
        .as_deref()
        .ok_or_else(|| AssessmentError::MissingField(field.to_string()))
}

/// Checks one group of parallel arrays: none empty, all the same length,
/// every value finite.
fn check_parallel(fields: &[(&str, &[f64])]) -> Result<(), AssessmentError> {
    for (name, values) in fields {
        if values.is_empty() {
            return Err(AssessmentError::InsufficientData(name.to_string()));
        }
    }

    if let Some((first_name, first)) = fields.first() {
        for (name, values) in &fields[1..] {
            if values.len() != first.len() {
                return Err(AssessmentError::MalformedSeries(format!(
                    "{} has {} values but {} has {}",
                    name,
                    values.len(),
                    first_name,
                    first.len()
                )));
            }
        }
    }

    for (name, values) in fields {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(AssessmentError::MalformedSeries(format!(
                "{}[{}] is not a finite number",
                name, index
            )));
        }
    }

    Ok(())
}

fn validate<'a>(
    weather: &'a WeatherSeries,
    hydrology: &'a HydrologySeries,
) -> Result<(WeatherView<'a>, HydrologyView<'a>), AssessmentError> {
    // Presence of every field is checked before any length or value check.
    let max_temp = require(&weather.max_temp, FIELD_MAX_TEMP)?;
    let min_temp = require(&weather.min_temp, FIELD_MIN_TEMP)?;
    let precipitation_sum = require(&weather.precipitation_sum, FIELD_PRECIP_SUM)?;
    let precipitation_probability =
        require(&weather.precipitation_probability_max, FIELD_PRECIP_PROBABILITY)?;
    let wind_speed = require(&weather.wind_speed_max, FIELD_WIND_SPEED)?;
    let wind_gust = require(&weather.wind_gust_max, FIELD_WIND_GUST)?;
    let discharge = require(&hydrology.discharge, FIELD_DISCHARGE)?;
    let discharge_max = require(&hydrology.discharge_max, FIELD_DISCHARGE_MAX)?;

    check_parallel(&[
        (FIELD_MAX_TEMP, max_temp),
        (FIELD_MIN_TEMP, min_temp),
        (FIELD_PRECIP_SUM, precipitation_sum),
        (FIELD_PRECIP_PROBABILITY, precipitation_probability),
        (FIELD_WIND_SPEED, wind_speed),
        (FIELD_WIND_GUST, wind_gust),
    ])?;
    check_parallel(&[(FIELD_DISCHARGE, discharge), (FIELD_DISCHARGE_MAX, discharge_max)])?;

    Ok((
        WeatherView {
            max_temp,
            precipitation_sum,
            precipitation_probability,
            wind_speed,
            wind_gust,
        },
        HydrologyView { discharge },
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn classify(high: bool, medium: bool) -> RiskLevel {
    if high {
        RiskLevel::High
    } else if medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Rounds half away from zero, then clamps into `[floor, cap]`.
fn percent(raw: f64, floor: f64, cap: f64) -> u8 {
    raw.round().clamp(floor, cap) as u8
}

fn assessment(level: RiskLevel, probability: u8, detail: String) -> HazardAssessment {
    HazardAssessment { level, probability, detail }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Stateless hazard scorer. Holds only its calibration, so one instance can
/// be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct HazardAnalyzer {
    thresholds: HazardThresholds,
}

impl HazardAnalyzer {
    pub fn new(thresholds: HazardThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HazardThresholds {
        &self.thresholds
    }

    /// Scores all five hazards for one location.
    ///
    /// # Errors
    /// - `AssessmentError::MissingField` - a required array is absent.
    /// - `AssessmentError::InsufficientData` - a required array is empty.
    /// - `AssessmentError::MalformedSeries` - parallel arrays differ in
    ///   length, or a value is NaN or infinite.
    pub fn assess(
        &self,
        weather: &WeatherSeries,
        hydrology: &HydrologySeries,
    ) -> Result<HazardMap, AssessmentError> {
        let (weather, hydrology) = validate(weather, hydrology)?;

        let avg_max_temp = mean(weather.max_temp);
        let avg_precip = mean(weather.precipitation_sum);
        let max_gust = max(weather.wind_gust);

        let mut hazards = HazardMap::new();
        hazards.insert(HazardKind::Flood, self.flood(hydrology.discharge));
        hazards.insert(
            HazardKind::Wildfire,
            self.wildfire(avg_max_temp, weather.precipitation_sum),
        );
        hazards.insert(HazardKind::Wind, self.wind(max(weather.wind_speed), max_gust));
        hazards.insert(HazardKind::Drought, self.drought(avg_precip, avg_max_temp));
        hazards.insert(
            HazardKind::Storm,
            self.storm(max(weather.precipitation_probability), max_gust),
        );
        Ok(hazards)
    }

    fn flood(&self, discharge: &[f64]) -> HazardAssessment {
        let t = &self.thresholds.flood;
        let avg_discharge = mean(discharge);
        let max_discharge = max(discharge);
        let ratio = max_discharge / if avg_discharge == 0.0 { 1.0 } else { avg_discharge };

        let level = classify(
            max_discharge > t.high_discharge || ratio > t.high_ratio,
            max_discharge > t.medium_discharge || ratio > t.medium_ratio,
        );
        let raw = match level {
            RiskLevel::High => ratio * 30.0,
            RiskLevel::Medium => ratio * 20.0,
            RiskLevel::Low => ratio * 10.0,
        };
        let detail = match level {
            RiskLevel::High => format!(
                "High flood risk with maximum river discharge of {:.1} m³/s ({:.2}x the period mean)",
                max_discharge, ratio
            ),
            RiskLevel::Medium => format!(
                "Moderate flood risk with elevated river discharge peaking at {:.1} m³/s ({:.2}x the period mean)",
                max_discharge, ratio
            ),
            RiskLevel::Low => format!(
                "Low flood risk; river discharge peaks at {:.1} m³/s ({:.2}x the period mean)",
                max_discharge, ratio
            ),
        };
        assessment(level, percent(raw, 0.0, FLOOD_CAPS.for_level(level)), detail)
    }

    fn wildfire(&self, avg_max_temp: f64, precipitation: &[f64]) -> HazardAssessment {
        let t = &self.thresholds.wildfire;
        let dry_days = precipitation.iter().filter(|&&p| p < t.dry_day_precip).count();
        let dry_fraction = dry_days as f64 / precipitation.len() as f64;
        let factor = (avg_max_temp - t.base_temp) * dry_fraction * 10.0;

        let level = classify(factor > t.high_factor, factor > t.medium_factor);
        // Same expression in every tier; only the cap differs.
        let probability = percent(factor / 2.0, 0.0, WILDFIRE_CAPS.for_level(level));
        let detail = format!(
            "{} fire risk (factor {:.1}): mean high of {:.1}°C with {} of {} days dry",
            level_prefix(level),
            factor,
            avg_max_temp,
            dry_days,
            precipitation.len()
        );
        assessment(level, probability, detail)
    }

    fn wind(&self, max_wind_speed: f64, max_gust: f64) -> HazardAssessment {
        let t = &self.thresholds.wind;
        let level = classify(
            max_gust > t.high_gust || max_wind_speed > t.high_speed,
            max_gust > t.medium_gust || max_wind_speed > t.medium_speed,
        );
        let raw = match level {
            RiskLevel::High => max_gust,
            RiskLevel::Medium => max_gust / 1.5,
            RiskLevel::Low => max_gust / 2.0,
        };
        let detail = format!(
            "{} wind risk with maximum gusts of {:.1} km/h and sustained winds up to {:.1} km/h",
            level_prefix(level),
            max_gust,
            max_wind_speed
        );
        assessment(level, percent(raw, 0.0, WIND_CAPS.for_level(level)), detail)
    }

    fn drought(&self, avg_precip: f64, avg_max_temp: f64) -> HazardAssessment {
        let t = &self.thresholds.drought;
        let precip_deficit = t.normal_precip - avg_precip;
        let temp_excess = avg_max_temp - t.baseline_temp;
        let factor = precip_deficit * temp_excess;

        let level = classify(factor > t.high_factor, factor > t.medium_factor);
        let probability = match level {
            RiskLevel::High => percent(50.0 + factor, 0.0, DROUGHT_CAPS.high),
            RiskLevel::Medium => percent(30.0 + factor, 0.0, DROUGHT_CAPS.medium),
            RiskLevel::Low => percent(factor, DROUGHT_LOW_FLOOR, DROUGHT_CAPS.low),
        };
        let detail = format!(
            "{} drought risk (factor {:.1}): mean rainfall {:.1} mm/day against a mean high of {:.1}°C",
            level_prefix(level),
            factor,
            avg_precip,
            avg_max_temp
        );
        assessment(level, probability, detail)
    }

    fn storm(&self, max_precip_probability: f64, max_gust: f64) -> HazardAssessment {
        let t = &self.thresholds.storm;
        let factor = (max_precip_probability / 100.0) * (max_gust / t.reference_gust) * 100.0;

        let level = classify(factor > t.high_factor, factor > t.medium_factor);
        let probability = percent(factor / 2.0, 0.0, STORM_CAPS.for_level(level));
        let detail = format!(
            "{} storm/hail risk (factor {:.1}): precipitation probability up to {:.0}% with gusts to {:.1} km/h",
            level_prefix(level),
            factor,
            max_precip_probability,
            max_gust
        );
        assessment(level, probability, detail)
    }
}

fn level_prefix(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "High",
        RiskLevel::Medium => "Moderate",
        RiskLevel::Low => "Low",
    }
}

/// Scores all five hazards with the built-in calibration.
pub fn assess(
    weather: &WeatherSeries,
    hydrology: &HydrologySeries,
) -> Result<HazardMap, AssessmentError> {
    HazardAnalyzer::default().assess(weather, hydrology)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
