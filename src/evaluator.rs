/// Fetch-then-evaluate for one location.
///
/// `LocationEvaluator` pairs a `SeriesSource` (where the weather and
/// discharge series come from) with a `RiskEngine` (how they are scored).
/// The HTTP endpoint and the portfolio runner both go through it; tests
/// swap in a canned source so nothing touches the network.

use crate::analysis::RiskEngine;
use crate::ingest::{open_meteo, IngestError};
use crate::model::{
    AssessmentError, Coordinate, CoordinateError, HydrologySeries, RiskAssessment, WeatherSeries,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Supplies the raw series for a coordinate.
pub trait SeriesSource: Send + Sync {
    fn weather(&self, coordinate: Coordinate) -> Result<WeatherSeries, IngestError>;
    fn hydrology(&self, coordinate: Coordinate) -> Result<HydrologySeries, IngestError>;
}

/// Live Open-Meteo forecast and flood APIs.
pub struct OpenMeteoSource {
    client: reqwest::blocking::Client,
}

impl OpenMeteoSource {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl SeriesSource for OpenMeteoSource {
    fn weather(&self, coordinate: Coordinate) -> Result<WeatherSeries, IngestError> {
        open_meteo::fetch_weather(&self.client, coordinate)
    }

    fn hydrology(&self, coordinate: Coordinate) -> Result<HydrologySeries, IngestError> {
        open_meteo::fetch_hydrology(&self.client, coordinate)
    }
}

/// Any failure between a coordinate and a finished assessment.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    /// The worker evaluating this location stopped before reporting.
    #[error("evaluation did not complete")]
    Incomplete,
}

#[derive(Clone)]
pub struct LocationEvaluator {
    source: Arc<dyn SeriesSource>,
    engine: RiskEngine,
}

impl LocationEvaluator {
    pub fn new(source: Arc<dyn SeriesSource>, engine: RiskEngine) -> Self {
        Self { source, engine }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    /// Fetches both series for `coordinate` and scores them.
    pub fn evaluate(&self, coordinate: Coordinate) -> Result<RiskAssessment, EvaluationError> {
        let weather = self.source.weather(coordinate)?;
        let hydrology = self.source.hydrology(coordinate)?;
        debug!(%coordinate, "series received");

        let assessment = self.engine.evaluate(&weather, &hydrology)?;
        info!(
            %coordinate,
            premium_multiplier = %assessment.premium_multiplier,
            "risk evaluated"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal::Decimal;

    /// Canned source: hot and dry everywhere, unless the latitude is
    /// negative, in which case the flood provider is down.
    pub(crate) struct CannedSource;

    impl SeriesSource for CannedSource {
        fn weather(&self, _coordinate: Coordinate) -> Result<WeatherSeries, IngestError> {
            Ok(WeatherSeries {
                time: None,
                max_temp: Some(vec![30.0; 14]),
                min_temp: Some(vec![18.0; 14]),
                precipitation_sum: Some(vec![0.0; 14]),
                precipitation_probability_max: Some(vec![10.0; 14]),
                wind_speed_max: Some(vec![20.0; 14]),
                wind_gust_max: Some(vec![20.0; 14]),
            })
        }

        fn hydrology(&self, coordinate: Coordinate) -> Result<HydrologySeries, IngestError> {
            if coordinate.latitude < 0.0 {
                return Err(IngestError::Status {
                    status: 503,
                    reason: "flood model unavailable".to_string(),
                });
            }
            Ok(HydrologySeries {
                time: None,
                discharge: Some(vec![50.0; 14]),
                discharge_max: Some(vec![50.0; 14]),
            })
        }
    }

    pub(crate) fn canned_evaluator() -> LocationEvaluator {
        LocationEvaluator::new(Arc::new(CannedSource), RiskEngine::default())
    }

    #[test]
    fn test_evaluate_scores_fetched_series() {
        let result = canned_evaluator()
            .evaluate(Coordinate::new(35.0, -110.0).unwrap())
            .expect("canned series are valid");
        assert_eq!(result.premium_multiplier, Decimal::new(20, 1));
    }

    #[test]
    fn test_ingest_failure_is_reported() {
        let err = canned_evaluator()
            .evaluate(Coordinate::new(-33.9, 151.2).unwrap())
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Ingest(IngestError::Status { status: 503, .. })));
    }
}
