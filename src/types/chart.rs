use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::IndicatorKind;

/// OHLC (Open, High, Low, Close) data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OhlcPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// A pivot-point support or resistance level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceLevel {
    pub price: f64,
    /// One of "S2", "S1", "PP", "R1", "R2".
    pub label: String,
}

/// One bar of an indicator line. `value` is None during warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: i64,
    pub value: Option<f64>,
}

/// Full per-bar lines of one indicator, for chart overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: IndicatorKind,
    /// Line name (e.g. "macd", "signal") to one point per candle.
    pub lines: BTreeMap<String, Vec<SeriesPoint>>,
}
