/// Single entry point for a complete risk evaluation.
///
/// Every consumer (CLI, HTTP endpoint, portfolio runner) goes through
/// `RiskEngine::evaluate`, so there is exactly one place where hazards are
/// scored and the premium is derived from them.

use crate::analysis::hazards::HazardAnalyzer;
use crate::config::{PremiumWeights, RiskConfig};
use crate::model::{AssessmentError, HydrologySeries, RiskAssessment, WeatherSeries};

#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    analyzer: HazardAnalyzer,
    weights: PremiumWeights,
}

impl RiskEngine {
    pub fn new(analyzer: HazardAnalyzer, weights: PremiumWeights) -> Self {
        Self { analyzer, weights }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(
            HazardAnalyzer::new(config.thresholds.clone()),
            config.premium.clone(),
        )
    }

    pub fn analyzer(&self) -> &HazardAnalyzer {
        &self.analyzer
    }

    pub fn weights(&self) -> &PremiumWeights {
        &self.weights
    }

    /// Scores the hazards, then aggregates the premium. Aggregation only
    /// runs once assessment has succeeded.
    pub fn evaluate(
        &self,
        weather: &WeatherSeries,
        hydrology: &HydrologySeries,
    ) -> Result<RiskAssessment, AssessmentError> {
        let hazards = self.analyzer.assess(weather, hydrology)?;
        let premium_multiplier = self.weights.aggregate(&hazards);
        Ok(RiskAssessment {
            hazards,
            premium_multiplier,
        })
    }
}

/// Evaluates with the built-in calibration.
pub fn evaluate(
    weather: &WeatherSeries,
    hydrology: &HydrologySeries,
) -> Result<RiskAssessment, AssessmentError> {
    RiskEngine::default().evaluate(weather, hydrology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HazardKind, RiskLevel};
    use rust_decimal::Decimal;

    fn weather(max_temp: f64, precip: f64) -> WeatherSeries {
        WeatherSeries {
            time: None,
            max_temp: Some(vec![max_temp; 14]),
            min_temp: Some(vec![max_temp - 12.0; 14]),
            precipitation_sum: Some(vec![precip; 14]),
            precipitation_probability_max: Some(vec![10.0; 14]),
            wind_speed_max: Some(vec![20.0; 14]),
            wind_gust_max: Some(vec![20.0; 14]),
        }
    }

    fn flows() -> HydrologySeries {
        HydrologySeries {
            time: None,
            discharge: Some(vec![50.0; 14]),
            discharge_max: Some(vec![50.0; 14]),
        }
    }

    #[test]
    fn test_hot_dry_scenario_multiplier_is_two() {
        let result = evaluate(&weather(30.0, 0.0), &flows()).expect("valid input");
        assert_eq!(result.level(HazardKind::Wildfire), Some(RiskLevel::High));
        assert_eq!(result.level(HazardKind::Drought), Some(RiskLevel::High));
        assert_eq!(result.premium_multiplier, Decimal::new(20, 1));
    }

    #[test]
    fn test_mild_scenario_multiplier_is_one() {
        let result = evaluate(&weather(18.0, 6.0), &flows()).unwrap();
        assert!(!result.has_high_hazard());
        assert_eq!(result.premium_multiplier, Decimal::ONE);
    }

    #[test]
    fn test_assessment_error_stops_before_aggregation() {
        let mut w = weather(30.0, 0.0);
        w.precipitation_sum = None;
        let err = evaluate(&w, &flows()).unwrap_err();
        assert_eq!(err, AssessmentError::MissingField("precipitation_sum".to_string()));
    }

    #[test]
    fn test_engine_uses_configured_weights() {
        let mut config = RiskConfig::default();
        config.premium.high = Decimal::ONE;
        let engine = RiskEngine::from_config(&config);

        let result = engine.evaluate(&weather(30.0, 0.0), &flows()).unwrap();
        // Two High hazards at +1.0 each.
        assert_eq!(result.premium_multiplier, Decimal::new(30, 1));
    }
}
