//! Composite signal scoring.
//!
//! Maps raw indicator readings to continuous scores, aggregates them by
//! group into an overall score, and measures cross-indicator consensus.
//! Readings can be supplied directly or derived from candles and
//! derivatives histories.

pub mod composite;
pub mod derivatives;
pub mod indicators;
pub mod levels;
pub mod mapping;
pub mod method;
pub mod store;

pub use composite::{aggregate, consensus, evaluate, group_scores, score_indicator};
pub use derivatives::derivatives_readings;
pub use indicators::{all_sources, indicator_series, readings_from_candles};
pub use levels::support_resistance;
pub use mapping::{score_reading, ScoredReading};
pub use method::ScoringMethod;
pub use store::{SignalStore, StoredEvaluation};

use crate::types::{IndicatorKind, IndicatorReading, OhlcPoint};

/// Something that derives an indicator reading from OHLC candles.
pub trait ReadingSource: Send + Sync {
    /// Indicator this source produces.
    fn kind(&self) -> IndicatorKind;

    /// Minimum number of candles required.
    fn min_periods(&self) -> usize;

    /// Derive the latest reading.
    /// Returns None if there is insufficient data.
    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading>;

    /// Named per-bar lines for charting, each the same length as `candles`.
    /// Bars inside the warm-up window are None.
    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)>;
}

/// Clamp a value to the continuous score range.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Round to 4 decimal places. Normalizes -0.0 to 0.0.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0 + 0.0
}
