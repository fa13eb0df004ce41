/// Risk calibration loader - parses risk.toml
///
/// Separates hazard thresholds and premium weights from code, so an
/// underwriting team can recalibrate without recompiling the service.
/// Every key is optional; anything left out falls back to the built-in
/// calibration below.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "risk.toml";

// ---------------------------------------------------------------------------
// Hazard thresholds
// ---------------------------------------------------------------------------

/// River discharge thresholds (m³/s and max/mean ratio).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloodThresholds {
    pub high_discharge: f64,
    pub high_ratio: f64,
    pub medium_discharge: f64,
    pub medium_ratio: f64,
}

impl Default for FloodThresholds {
    fn default() -> Self {
        Self {
            high_discharge: 500.0,
            high_ratio: 2.0,
            medium_discharge: 200.0,
            medium_ratio: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WildfireThresholds {
    /// Temperature (°C) below which heat adds no fire risk.
    pub base_temp: f64,
    /// Daily precipitation (mm) below which a day counts as dry.
    pub dry_day_precip: f64,
    pub high_factor: f64,
    pub medium_factor: f64,
}

impl Default for WildfireThresholds {
    fn default() -> Self {
        Self {
            base_temp: 15.0,
            dry_day_precip: 1.0,
            high_factor: 100.0,
            medium_factor: 50.0,
        }
    }
}

/// Wind thresholds in km/h.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindThresholds {
    pub high_gust: f64,
    pub high_speed: f64,
    pub medium_gust: f64,
    pub medium_speed: f64,
}

impl Default for WindThresholds {
    fn default() -> Self {
        Self {
            high_gust: 80.0,
            high_speed: 50.0,
            medium_gust: 50.0,
            medium_speed: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DroughtThresholds {
    /// Daily precipitation (mm) considered normal.
    pub normal_precip: f64,
    /// Baseline maximum temperature (°C).
    pub baseline_temp: f64,
    pub high_factor: f64,
    pub medium_factor: f64,
}

impl Default for DroughtThresholds {
    fn default() -> Self {
        Self {
            normal_precip: 10.0,
            baseline_temp: 20.0,
            high_factor: 50.0,
            medium_factor: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StormThresholds {
    /// Gust speed (km/h) that scores as a full unit of storm wind.
    pub reference_gust: f64,
    pub high_factor: f64,
    pub medium_factor: f64,
}

impl Default for StormThresholds {
    fn default() -> Self {
        Self {
            reference_gust: 50.0,
            high_factor: 100.0,
            medium_factor: 50.0,
        }
    }
}

/// Classification thresholds for all five hazards, owned by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HazardThresholds {
    pub flood: FloodThresholds,
    pub wildfire: WildfireThresholds,
    pub wind: WindThresholds,
    pub drought: DroughtThresholds,
    pub storm: StormThresholds,
}

// ---------------------------------------------------------------------------
// Premium weights
// ---------------------------------------------------------------------------

/// Additive premium loading per risk level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PremiumWeights {
    pub base: Decimal,
    pub high: Decimal,
    pub medium: Decimal,
    pub low: Decimal,
}

impl Default for PremiumWeights {
    fn default() -> Self {
        Self {
            base: Decimal::ONE,
            high: Decimal::new(5, 1),
            medium: Decimal::new(2, 1),
            low: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Root configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub thresholds: HazardThresholds,
    pub premium: PremiumWeights,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl RiskConfig {
    /// Parses configuration from TOML text. Call `validate` before use.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Rejects calibrations with non-finite values, overlapping tiers, a
    /// non-positive storm reference gust, a base premium below 1, or a
    /// negative premium loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let values = [
            ("flood.high_discharge", t.flood.high_discharge),
            ("flood.high_ratio", t.flood.high_ratio),
            ("flood.medium_discharge", t.flood.medium_discharge),
            ("flood.medium_ratio", t.flood.medium_ratio),
            ("wildfire.base_temp", t.wildfire.base_temp),
            ("wildfire.dry_day_precip", t.wildfire.dry_day_precip),
            ("wildfire.high_factor", t.wildfire.high_factor),
            ("wildfire.medium_factor", t.wildfire.medium_factor),
            ("wind.high_gust", t.wind.high_gust),
            ("wind.high_speed", t.wind.high_speed),
            ("wind.medium_gust", t.wind.medium_gust),
            ("wind.medium_speed", t.wind.medium_speed),
            ("drought.normal_precip", t.drought.normal_precip),
            ("drought.baseline_temp", t.drought.baseline_temp),
            ("drought.high_factor", t.drought.high_factor),
            ("drought.medium_factor", t.drought.medium_factor),
            ("storm.reference_gust", t.storm.reference_gust),
            ("storm.high_factor", t.storm.high_factor),
            ("storm.medium_factor", t.storm.medium_factor),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, value)));
        }

        let tiers = [
            ("flood.discharge", t.flood.medium_discharge, t.flood.high_discharge),
            ("flood.ratio", t.flood.medium_ratio, t.flood.high_ratio),
            ("wildfire.factor", t.wildfire.medium_factor, t.wildfire.high_factor),
            ("wind.gust", t.wind.medium_gust, t.wind.high_gust),
            ("wind.speed", t.wind.medium_speed, t.wind.high_speed),
            ("drought.factor", t.drought.medium_factor, t.drought.high_factor),
            ("storm.factor", t.storm.medium_factor, t.storm.high_factor),
        ];
        for (name, medium, high) in tiers {
            if medium > high {
                return Err(ConfigError::Invalid(format!(
                    "{}: medium threshold {} exceeds high threshold {}",
                    name, medium, high
                )));
            }
        }
        if t.storm.reference_gust <= 0.0 {
            return Err(ConfigError::Invalid("storm.reference_gust must be positive".to_string()));
        }

        let p = &self.premium;
        // Keeps every multiplier at or above 1.0.
        if p.base < Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "premium.base must be at least 1, got {}",
                p.base
            )));
        }
        if p.high < Decimal::ZERO || p.medium < Decimal::ZERO || p.low < Decimal::ZERO {
            return Err(ConfigError::Invalid("premium weights must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Loads and validates configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<RiskConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = RiskConfig::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    config.validate()?;
    Ok(config)
}

/// Loads `risk.toml` from the working directory, or the built-in
/// calibration if no such file exists.
pub fn load_config() -> Result<RiskConfig, ConfigError> {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        load_config_from(path)
    } else {
        Ok(RiskConfig::default())
    }
}
