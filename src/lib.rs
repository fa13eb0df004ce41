/// climate_risk_service: multi-hazard climate risk scoring for insured properties.
///
/// # Module structure
///
/// ```text
/// climate_risk_service
/// ├── model       - shared data types (WeatherSeries, HazardAssessment, RiskAssessment, …)
/// ├── config      - risk calibration loader (risk.toml)
/// ├── properties  - tracked property registry (properties.toml)
/// ├── analysis
/// │   ├── hazards - flood, wildfire, wind, drought and storm scoring
/// │   ├── premium - hazard levels → premium multiplier
/// │   └── engine  - assess then aggregate; the single evaluation entry point
/// ├── ingest
/// │   ├── open_meteo - forecast + flood API: URL construction, JSON parsing, fetch
/// │   └── fixtures (test only) - representative API response payloads
/// ├── evaluator   - fetch-then-evaluate for one coordinate
/// ├── portfolio
/// │   └── runner  - parallel evaluation of the property registry
/// └── endpoint    - HTTP API for on-demand evaluation
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod evaluator;
pub mod ingest;
pub mod model;
pub mod portfolio;
pub mod properties;
