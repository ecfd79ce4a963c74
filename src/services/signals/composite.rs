//! Group aggregation, consensus and the evaluation entry point.

use tracing::debug;

use super::mapping::score_reading;
use super::round4;
use crate::error::ScoreError;
use crate::types::{
    CompositeResult, Evaluation, Group, GroupScore, IndicatorKind, IndicatorSignal,
    ReadingBundle, Signal,
};

/// Mean score of each group, in aggregation order. `None` for groups without data.
fn group_means(scores: &[(IndicatorKind, f64)]) -> Vec<(Group, Option<f64>, usize)> {
    Group::ALL
        .iter()
        .map(|&group| {
            let members: Vec<f64> = scores
                .iter()
                .filter(|(kind, _)| kind.group() == group)
                .map(|(_, score)| *score)
                .collect();

            let mean = if members.is_empty() {
                None
            } else {
                Some(members.iter().sum::<f64>() / members.len() as f64)
            };
            (group, mean, members.len())
        })
        .collect()
}

/// Average the available scores of each group.
///
/// Every group is listed; groups without data have no average.
pub fn group_scores(scores: &[(IndicatorKind, f64)]) -> Vec<GroupScore> {
    group_means(scores)
        .into_iter()
        .map(|(group, mean, count)| GroupScore {
            group,
            weight: group.weight(),
            average: mean.map(round4),
            count,
        })
        .collect()
}

/// Consensus: 1 minus the population standard deviation of the scores.
///
/// Not clamped. Callers must pass at least one score.
pub fn consensus(scores: &[f64]) -> f64 {
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    round4(1.0 - variance.sqrt())
}

/// Combine per-indicator scores into the composite result.
///
/// Groups without data contribute nothing and their weight is not
/// redistributed, so sparse bundles are pulled toward zero.
pub fn aggregate(scores: &[(IndicatorKind, f64)]) -> Result<CompositeResult, ScoreError> {
    if scores.is_empty() {
        return Err(ScoreError::EmptyInput);
    }

    let overall: f64 = group_means(scores)
        .into_iter()
        .filter_map(|(group, mean, _)| mean.map(|avg| avg * group.weight()))
        .sum();

    let overall_score = round4(overall);
    let all: Vec<f64> = scores.iter().map(|(_, score)| *score).collect();

    Ok(CompositeResult {
        overall_score,
        overall_signal: Signal::classify(overall_score),
        consensus: consensus(&all),
    })
}

/// Score every available reading in a bundle and combine them.
///
/// Invalid readings are dropped and the rest still scored. Fails with
/// `EmptyInput` only when nothing can be scored.
pub fn evaluate(bundle: &ReadingBundle) -> Result<Evaluation, ScoreError> {
    let mut indicators: Vec<IndicatorSignal> = Vec::new();

    for kind in IndicatorKind::ALL {
        let Some(reading) = bundle.get(kind) else {
            debug!("No {} reading, excluding from composite", kind);
            continue;
        };

        match score_reading(&reading) {
            Ok(scored) => indicators.push(scored.into_signal()),
            Err(e) => debug!("Excluding {} from composite: {}", kind, e),
        }
    }

    let scores: Vec<(IndicatorKind, f64)> = indicators
        .iter()
        .map(|s| (s.name, s.continuous_score))
        .collect();

    let composite = aggregate(&scores)?;
    let groups = group_scores(&scores);

    Ok(Evaluation {
        indicators,
        composite,
        groups,
    })
}

/// Score a single indicator from a bundle.
pub fn score_indicator(
    bundle: &ReadingBundle,
    kind: IndicatorKind,
) -> Result<IndicatorSignal, ScoreError> {
    let reading = bundle.get(kind).ok_or(ScoreError::MissingIndicator(kind))?;
    Ok(score_reading(&reading)?.into_signal())
}
