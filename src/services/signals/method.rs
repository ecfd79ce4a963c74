//! Self-description of the scoring method, generated from the same
//! constants the scorer applies.

use serde::Serialize;

use crate::types::{ConsensusBand, Group, IndicatorKind, BEARISH_THRESHOLD, BULLISH_THRESHOLD};

/// Bumped whenever group membership, weights or mappings change.
pub const METHOD_VERSION: &str = "2";

#[derive(Debug, Clone, Serialize)]
pub struct GroupDefinition {
    pub group: Group,
    pub name: &'static str,
    pub weight: f64,
    pub indicators: Vec<IndicatorKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsensusBandDefinition {
    pub label: &'static str,
    /// Inclusive lower bound of the band.
    pub min: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoringMethod {
    pub version: &'static str,
    pub groups: Vec<GroupDefinition>,
    pub bullish_threshold: f64,
    pub bearish_threshold: f64,
    /// Whether weights of groups without data are redistributed.
    pub renormalizes_missing_groups: bool,
    pub consensus_bands: Vec<ConsensusBandDefinition>,
    pub mappings: Vec<MappingDescription>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingDescription {
    pub indicator: IndicatorKind,
    pub description: &'static str,
}

impl ScoringMethod {
    pub fn current() -> Self {
        Self {
            version: METHOD_VERSION,
            groups: Group::ALL
                .iter()
                .map(|group| GroupDefinition {
                    group: *group,
                    name: group.name(),
                    weight: group.weight(),
                    indicators: group.members(),
                })
                .collect(),
            bullish_threshold: BULLISH_THRESHOLD,
            bearish_threshold: BEARISH_THRESHOLD,
            renormalizes_missing_groups: false,
            consensus_bands: vec![
                ConsensusBandDefinition {
                    label: ConsensusBand::HighlyAligned.label(),
                    min: Some(0.8),
                },
                ConsensusBandDefinition {
                    label: ConsensusBand::ModeratelyAligned.label(),
                    min: Some(0.5),
                },
                ConsensusBandDefinition {
                    label: ConsensusBand::HighlyDivergent.label(),
                    min: None,
                },
            ],
            mappings: IndicatorKind::ALL
                .iter()
                .map(|kind| MappingDescription {
                    indicator: *kind,
                    description: mapping_description(*kind),
                })
                .collect(),
        }
    }

    /// Sum of group weights. Exactly 1.0.
    pub fn total_weight(&self) -> f64 {
        Group::ALL.iter().map(|g| g.weight_bps()).sum::<u32>() as f64 / 10_000.0
    }
}

fn mapping_description(kind: IndicatorKind) -> &'static str {
    match kind {
        IndicatorKind::Rsi => "Piecewise linear: 50 -> 0, 30 -> +0.4, 70 -> -0.4",
        IndicatorKind::Kd => "%K zone score with +/-0.3 for a fresh K/D cross",
        IndicatorKind::Macd => "tanh of histogram as % of price, momentum-adjusted",
        IndicatorKind::Ema => "tanh of fast/slow spread %, +/-0.2 on a cross",
        IndicatorKind::Bbands => "%B: 0.5 -> 0, 0 -> +0.5, 1 -> -0.5",
        IndicatorKind::Volume => "OBV direction weighted by relative volume",
        IndicatorKind::OpenInterest => "Compressed for moderate growth, tanh above +15%",
        IndicatorKind::LongShortRatio => "Contrarian tanh, compressed within 0.8-1.2",
        IndicatorKind::Taker => "Trend-following tanh, compressed within 0.95-1.05",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let method = ScoringMethod::current();
        assert_eq!(method.total_weight(), 1.0);
        assert_eq!(
            Group::ALL.iter().map(|g| g.weight_bps()).sum::<u32>(),
            10_000
        );
    }

    #[test]
    fn test_every_indicator_in_exactly_one_group() {
        let method = ScoringMethod::current();
        for kind in IndicatorKind::ALL {
            let count = method
                .groups
                .iter()
                .filter(|g| g.indicators.contains(&kind))
                .count();
            assert_eq!(count, 1, "{} should be in one group", kind);
        }
    }

    #[test]
    fn test_method_serializes_documented_weights() {
        let json = serde_json::to_value(ScoringMethod::current()).unwrap();
        assert_eq!(json["version"], "2");
        assert_eq!(json["groups"][0]["group"], "momentum");
        assert_eq!(json["groups"][0]["weight"], 0.25);
        assert_eq!(json["groups"][4]["indicators"][1], "LS_Ratio");
        assert_eq!(json["renormalizes_missing_groups"], false);
        assert_eq!(json["consensus_bands"][0]["label"], "Highly aligned");
        assert_eq!(json["consensus_bands"][2]["label"], "Highly divergent");
    }
}
