/// Premium multiplier aggregation.
///
/// Reduces per-hazard risk levels to one multiplier on the baseline premium
/// by additive loading: start at `base`, add `high` for every High hazard
/// and `medium` for every Medium one, round to one decimal place.
///
/// The aggregator is lenient where the analyzer is strict: absent hazard
/// kinds contribute nothing and it never fails.

use crate::config::PremiumWeights;
use crate::model::{HazardMap, RiskLevel};
use rust_decimal::{Decimal, RoundingStrategy};

impl PremiumWeights {
    fn loading(&self, level: RiskLevel) -> Decimal {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }

    /// Sums the loading for each level onto the base, rounded to one
    /// decimal place half away from zero.
    pub fn aggregate_levels<I>(&self, levels: I) -> Decimal
    where
        I: IntoIterator<Item = RiskLevel>,
    {
        levels
            .into_iter()
            .fold(self.base, |total, level| total + self.loading(level))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn aggregate(&self, assessments: &HazardMap) -> Decimal {
        self.aggregate_levels(assessments.values().map(|a| a.level))
    }
}

/// Premium multiplier with the standard loading (+0.5 High, +0.2 Medium).
pub fn aggregate(assessments: &HazardMap) -> Decimal {
    PremiumWeights::default().aggregate(assessments)
}

/// Same reduction over bare levels, for callers that never built a map.
pub fn aggregate_levels<I>(levels: I) -> Decimal
where
    I: IntoIterator<Item = RiskLevel>,
{
    PremiumWeights::default().aggregate_levels(levels)
}
