/// Risk analysis for the climate risk service.
///
/// Submodules:
/// - `hazards` - scores flood, wildfire, wind, drought and storm risk
///   from daily weather and discharge series.
/// - `premium` - reduces hazard levels to a premium multiplier.
/// - `engine`  - runs both in order; the one entry point callers use.

pub mod engine;
pub mod hazards;
pub mod premium;

pub use engine::{evaluate, RiskEngine};
pub use hazards::{assess, HazardAnalyzer};
pub use premium::aggregate;
