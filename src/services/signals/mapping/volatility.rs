//! Bollinger %B score mapping.

use super::{finite, finite_opt, ScoredReading};
use crate::error::ScoreError;
use crate::types::{BbandsReading, IndicatorKind};

/// %B to score: 0 → +0.5, 0.5 → 0, 1 → -0.5, linear between.
/// Outside the bands the score holds at the nearest endpoint.
pub fn bbands_score(percent_b: f64) -> f64 {
    0.5 - percent_b.clamp(0.0, 1.0)
}

pub fn score_bbands(reading: &BbandsReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::Bbands;
    let percent_b = finite(kind, "percent_b", reading.percent_b)?;
    let upper = finite_opt(kind, "upper", reading.upper)?;
    let middle = finite_opt(kind, "middle", reading.middle)?;
    let lower = finite_opt(kind, "lower", reading.lower)?;

    let position = if percent_b > 1.0 {
        "above_upper"
    } else if percent_b < 0.0 {
        "below_lower"
    } else {
        "inside"
    };

    Ok(ScoredReading::new(kind, bbands_score(percent_b))
        .value("percent_b", percent_b)
        .value("upper", upper)
        .value("middle", middle)
        .value("lower", lower)
        .meta("position", position))
}
