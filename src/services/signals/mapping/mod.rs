//! Per-indicator continuous score mappings.
//!
//! Each mapping validates its reading, produces a score in [-1, +1]
//! (rounded to 4 dp), and records the raw values and labels it used.

pub mod derivatives;
pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::round4;
use crate::error::ScoreError;
use crate::types::{IndicatorKind, IndicatorReading, IndicatorSignal, Signal};

/// A reading after mapping, before it becomes an `IndicatorSignal`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredReading {
    pub kind: IndicatorKind,
    pub score: f64,
    pub latest_values: BTreeMap<String, Option<f64>>,
    pub metadata: Map<String, Value>,
}

impl ScoredReading {
    pub(crate) fn new(kind: IndicatorKind, score: f64) -> Self {
        Self {
            kind,
            score: round4(score),
            latest_values: BTreeMap::new(),
            metadata: Map::new(),
        }
    }

    pub(crate) fn value(mut self, name: &str, value: impl Into<Option<f64>>) -> Self {
        self.latest_values
            .insert(name.to_string(), value.into().map(round4));
        self
    }

    pub(crate) fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Classify and package as the public indicator signal.
    pub fn into_signal(self) -> IndicatorSignal {
        IndicatorSignal {
            name: self.kind,
            signal: Signal::classify(self.score),
            strength: self.score.abs(),
            continuous_score: self.score,
            latest_values: self.latest_values,
            metadata: self.metadata,
        }
    }
}

/// Map one reading to its continuous score.
pub fn score_reading(reading: &IndicatorReading) -> Result<ScoredReading, ScoreError> {
    match reading {
        IndicatorReading::Rsi(r) => momentum::score_rsi(r),
        IndicatorReading::Kd(r) => momentum::score_kd(r),
        IndicatorReading::Macd(r) => momentum::score_macd(r),
        IndicatorReading::Ema(r) => trend::score_ema(r),
        IndicatorReading::Bbands(r) => volatility::score_bbands(r),
        IndicatorReading::Volume(r) => volume::score_volume(r),
        IndicatorReading::OpenInterest(r) => derivatives::score_open_interest(r),
        IndicatorReading::LongShortRatio(r) => derivatives::score_long_short(r),
        IndicatorReading::Taker(r) => derivatives::score_taker(r),
    }
}

/// Reject NaN and infinite inputs.
pub(crate) fn finite(kind: IndicatorKind, field: &str, value: f64) -> Result<f64, ScoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreError::invalid(kind, format!("{} is not finite", field)))
    }
}

/// Reject NaN and infinite optional inputs.
pub(crate) fn finite_opt(
    kind: IndicatorKind,
    field: &str,
    value: Option<f64>,
) -> Result<Option<f64>, ScoreError> {
    value.map(|v| finite(kind, field, v)).transpose()
}

/// Reject non-positive inputs.
pub(crate) fn positive(kind: IndicatorKind, field: &str, value: f64) -> Result<f64, ScoreError> {
    let value = finite(kind, field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ScoreError::invalid(kind, format!("{} must be positive", field)))
    }
}

/// Reject inputs outside an inclusive range.
pub(crate) fn within(
    kind: IndicatorKind,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ScoreError> {
    let value = finite(kind, field, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ScoreError::invalid(
            kind,
            format!("{} must be within {}..={}", field, min, max),
        ))
    }
}
