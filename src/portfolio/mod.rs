/// Portfolio-level view over many property evaluations.
///
/// `PortfolioSummary::from_outcomes` rolls per-property results up into the
/// figures the dashboard headlines: how many properties were scored, the
/// average premium multiplier, how many carry at least one High hazard,
/// High counts per hazard kind, and share and insured value per risk tier.
///
/// Submodules:
/// - `runner` - evaluates a property list in parallel on a thread pool.

pub mod runner;

use crate::evaluator::EvaluationError;
use crate::model::{HazardKind, RiskAssessment, RiskLevel};
use crate::properties::Property;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Per-property outcome
// ---------------------------------------------------------------------------

/// Result of evaluating one property. A failure here affects only this
/// property.
#[derive(Debug)]
pub struct PropertyOutcome {
    pub property: Property,
    pub evaluated_at: DateTime<Utc>,
    pub result: Result<RiskAssessment, EvaluationError>,
}

impl PropertyOutcome {
    pub fn assessment(&self) -> Option<&RiskAssessment> {
        self.result.as_ref().ok()
    }

    pub fn tier(&self) -> RiskTier {
        RiskTier::classify(self.assessment())
    }

    /// Declared property value, or zero when unknown.
    pub fn insured_value(&self) -> Decimal {
        self.property
            .value
            .and_then(|v| Decimal::try_from(v).ok())
            .unwrap_or(Decimal::ZERO)
    }

    /// Current premium scaled by the climate multiplier, if both are known.
    pub fn adjusted_premium(&self) -> Option<Decimal> {
        let premium = Decimal::try_from(self.property.premium?).ok()?;
        let multiplier = self.assessment()?.premium_multiplier;
        Some((premium * multiplier).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn report(&self) -> OutcomeReport {
        OutcomeReport {
            id: self.property.id.clone(),
            name: self.property.name.clone(),
            latitude: self.property.latitude,
            longitude: self.property.longitude,
            evaluated_at: self.evaluated_at,
            tier: self.tier(),
            assessment: self.assessment().cloned(),
            adjusted_premium: self.adjusted_premium(),
            error: self.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Serializable form of `PropertyOutcome`.
#[derive(Debug, Serialize)]
pub struct OutcomeReport {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub evaluated_at: DateTime<Utc>,
    pub tier: RiskTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_premium: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

/// Coarse bucket of a property's overall climate risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskTier {
    /// High above ×1.3, Medium above ×1.1, otherwise Low. No assessment
    /// means Unknown.
    pub fn classify(assessment: Option<&RiskAssessment>) -> Self {
        let Some(assessment) = assessment else {
            return RiskTier::Unknown;
        };
        let multiplier = assessment.premium_multiplier;
        if multiplier > Decimal::new(13, 1) {
            RiskTier::High
        } else if multiplier > Decimal::new(11, 1) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierTotals {
    pub properties: usize,
    /// Percentage of all properties in this tier, two decimal places.
    pub share: Decimal,
    /// Sum of property values; properties without a value count as zero.
    pub insured_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_properties: usize,
    pub assessed_properties: usize,
    pub failed_properties: usize,
    /// Mean over assessed properties, two decimal places; 1.00 if none.
    pub average_premium_multiplier: Decimal,
    /// Properties with at least one High hazard.
    pub properties_at_risk: usize,
    pub high_risk_hazards: BTreeMap<HazardKind, usize>,
    pub tiers: BTreeMap<RiskTier, TierTotals>,
}

impl PortfolioSummary {
    pub fn from_outcomes(outcomes: &[PropertyOutcome]) -> Self {
        let mut high_risk_hazards: BTreeMap<HazardKind, usize> =
            HazardKind::ALL.iter().map(|&k| (k, 0)).collect();
        let mut tiers: BTreeMap<RiskTier, TierTotals> = BTreeMap::new();
        let mut multiplier_total = Decimal::ZERO;
        let mut assessed = 0usize;
        let mut at_risk = 0usize;

        for outcome in outcomes {
            let totals = tiers.entry(outcome.tier()).or_default();
            totals.properties += 1;
            totals.insured_value += outcome.insured_value();

            let Some(assessment) = outcome.assessment() else {
                continue;
            };
            assessed += 1;
            multiplier_total += assessment.premium_multiplier;
            if assessment.has_high_hazard() {
                at_risk += 1;
            }
            for (kind, hazard) in &assessment.hazards {
                if hazard.level == RiskLevel::High {
                    *high_risk_hazards.entry(*kind).or_default() += 1;
                }
            }
        }

        let total = Decimal::from(outcomes.len());
        for totals in tiers.values_mut() {
            totals.share = (Decimal::from(totals.properties * 100) / total)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }

        let average_premium_multiplier = if assessed == 0 {
            Decimal::ONE
        } else {
            (multiplier_total / Decimal::from(assessed))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            total_properties: outcomes.len(),
            assessed_properties: assessed,
            failed_properties: outcomes.len() - assessed,
            average_premium_multiplier,
            properties_at_risk: at_risk,
            high_risk_hazards,
            tiers,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestError;
    use crate::model::{HazardAssessment, HazardMap};

    fn property(id: &str, value: Option<f64>, premium: Option<f64>) -> Property {
        Property {
            id: id.to_string(),
            name: format!("Property {}", id),
            latitude: 10.0,
            longitude: 10.0,
            value,
            premium,
        }
    }

    fn assessment(levels: &[(HazardKind, RiskLevel)], multiplier: Decimal) -> RiskAssessment {
        let hazards: HazardMap = levels
            .iter()
            .map(|&(kind, level)| {
                (
                    kind,
                    HazardAssessment {
                        level,
                        probability: 50,
                        detail: String::new(),
                    },
                )
            })
            .collect();
        RiskAssessment {
            hazards,
            premium_multiplier: multiplier,
        }
    }

    fn ok(p: Property, a: RiskAssessment) -> PropertyOutcome {
        PropertyOutcome {
            property: p,
            evaluated_at: Utc::now(),
            result: Ok(a),
        }
    }

    fn failed(p: Property) -> PropertyOutcome {
        PropertyOutcome {
            property: p,
            evaluated_at: Utc::now(),
            result: Err(EvaluationError::Ingest(IngestError::Api("down".to_string()))),
        }
    }

    #[test]
    fn test_tier_thresholds_are_strict() {
        let tier = |m: i64| RiskTier::classify(Some(&assessment(&[], Decimal::new(m, 1))));
        assert_eq!(tier(10), RiskTier::Low);
        assert_eq!(tier(11), RiskTier::Low);
        assert_eq!(tier(12), RiskTier::Medium);
        assert_eq!(tier(13), RiskTier::Medium);
        assert_eq!(tier(14), RiskTier::High);
        assert_eq!(RiskTier::classify(None), RiskTier::Unknown);
    }

    #[test]
    fn test_summary_counts_and_average() {
        let outcomes = vec![
            ok(
                property("A", Some(1_000_000.0), None),
                assessment(
                    &[(HazardKind::Flood, RiskLevel::High), (HazardKind::Wind, RiskLevel::High)],
                    Decimal::new(20, 1),
                ),
            ),
            ok(
                property("B", Some(500_000.0), None),
                assessment(&[(HazardKind::Flood, RiskLevel::Medium)], Decimal::new(12, 1)),
            ),
            ok(
                property("C", None, None),
                assessment(&[(HazardKind::Drought, RiskLevel::High)], Decimal::new(15, 1)),
            ),
            failed(property("D", Some(250_000.0), None)),
        ];

        let summary = PortfolioSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total_properties, 4);
        assert_eq!(summary.assessed_properties, 3);
        assert_eq!(summary.failed_properties, 1);
        // (2.0 + 1.2 + 1.5) / 3 = 1.5666.. -> 1.57
        assert_eq!(summary.average_premium_multiplier, Decimal::new(157, 2));
        assert_eq!(summary.properties_at_risk, 2);
        assert_eq!(summary.high_risk_hazards[&HazardKind::Flood], 1);
        assert_eq!(summary.high_risk_hazards[&HazardKind::Wind], 1);
        assert_eq!(summary.high_risk_hazards[&HazardKind::Drought], 1);
        assert_eq!(summary.high_risk_hazards[&HazardKind::Storm], 0);

        assert_eq!(summary.tiers[&RiskTier::High].properties, 2);
        assert_eq!(summary.tiers[&RiskTier::High].share, Decimal::new(50, 0));
        assert_eq!(summary.tiers[&RiskTier::Unknown].share, Decimal::new(25, 0));
        assert_eq!(summary.tiers[&RiskTier::High].insured_value, Decimal::new(1_000_000, 0));
        assert_eq!(summary.tiers[&RiskTier::Medium].insured_value, Decimal::new(500_000, 0));
        assert_eq!(summary.tiers[&RiskTier::Unknown].insured_value, Decimal::new(250_000, 0));
        assert_eq!(summary.tiers[&RiskTier::Unknown].properties, 1);
        assert!(!summary.tiers.contains_key(&RiskTier::Low));
    }

    #[test]
    fn test_tier_share_of_portfolio() {
        let outcomes = vec![
            ok(property("A", None, None), assessment(&[], Decimal::new(20, 1))),
            ok(property("B", None, None), assessment(&[], Decimal::new(12, 1))),
            ok(property("C", None, None), assessment(&[], Decimal::ONE)),
        ];

        let summary = PortfolioSummary::from_outcomes(&outcomes);
        // 1 of 3 properties per tier: 33.333.. -> 33.33
        for tier in [RiskTier::High, RiskTier::Medium, RiskTier::Low] {
            assert_eq!(summary.tiers[&tier].share, Decimal::new(3333, 2), "share of {:?}", tier);
            assert_eq!(summary.tiers[&tier].insured_value, Decimal::ZERO);
        }
    }

    #[test]
    fn test_summary_of_nothing_assessed() {
        let summary = PortfolioSummary::from_outcomes(&[failed(property("X", None, None))]);
        assert_eq!(summary.average_premium_multiplier, Decimal::ONE);
        assert_eq!(summary.properties_at_risk, 0);
        assert_eq!(summary.high_risk_hazards.len(), 5, "every kind reported, even at zero");
    }

    #[test]
    fn test_adjusted_premium() {
        let outcome = ok(
            property("A", None, Some(18_250.0)),
            assessment(&[], Decimal::new(17, 1)),
        );
        assert_eq!(outcome.adjusted_premium(), Some(Decimal::new(31_025, 0)));

        let no_premium = ok(property("B", None, None), assessment(&[], Decimal::ONE));
        assert_eq!(no_premium.adjusted_premium(), None);
    }

    #[test]
    fn test_report_carries_error_text() {
        let report = failed(property("D", None, None)).report();
        assert_eq!(report.tier, RiskTier::Unknown);
        assert!(report.assessment.is_none());
        assert_eq!(report.error.as_deref(), Some("upstream API error: down"));
    }
}
