//! Open interest, long/short ratio and taker volume score mappings.
//!
//! All three use tanh of the deviation from neutral, with the region
//! closest to neutral compressed so noise does not register as a signal.

use super::{finite, finite_opt, positive, ScoredReading};
use crate::error::ScoreError;
use crate::services::signals::clamp_score;
use crate::types::{IndicatorKind, LongShortReading, OpenInterestReading, TakerReading};

/// Multiplier applied inside the weak-signal band.
const WEAK_SIGNAL_FACTOR: f64 = 0.3;

/// OI change (%) to score.
///
/// Moderate growth reads as slightly positive participation, rapid
/// expansion beyond 15% as over-leverage. Falling OI is deleveraging and
/// carries no direction.
pub fn open_interest_score(change_pct: f64) -> f64 {
    if change_pct > 15.0 {
        clamp_score(-((change_pct - 15.0) / 15.0).tanh())
    } else if change_pct > 0.0 {
        change_pct / 15.0 * 0.15
    } else {
        0.0
    }
}

/// Long/short ratio to score. Contrarian: crowded longs are bearish.
pub fn long_short_score(ratio: f64) -> f64 {
    let mut raw = if ratio >= 1.0 {
        -((ratio - 1.0) / 0.8).tanh()
    } else {
        ((1.0 - ratio) / 0.5).tanh()
    };
    if (0.8..=1.2).contains(&ratio) {
        raw *= WEAK_SIGNAL_FACTOR;
    }
    clamp_score(raw)
}

/// Taker buy/sell ratio to score. Trend-following: buy pressure is bullish.
pub fn taker_score(ratio: f64) -> f64 {
    let mut raw = if ratio >= 1.0 {
        ((ratio - 1.0) / 0.25).tanh()
    } else {
        -((1.0 - ratio) / 0.25).tanh()
    };
    if (0.95..=1.05).contains(&ratio) {
        raw *= WEAK_SIGNAL_FACTOR;
    }
    clamp_score(raw)
}

pub fn open_interest_trend(change_pct: f64) -> &'static str {
    if change_pct > 3.0 {
        "rising"
    } else if change_pct < -3.0 {
        "falling"
    } else {
        "stable"
    }
}

pub fn long_short_trend(ratio: f64) -> &'static str {
    if ratio > 1.2 {
        "more_longs"
    } else if ratio < 0.8 {
        "more_shorts"
    } else {
        "balanced"
    }
}

pub fn taker_pressure(ratio: f64) -> &'static str {
    if ratio > 1.05 {
        "buying"
    } else if ratio < 0.95 {
        "selling"
    } else {
        "balanced"
    }
}

pub fn score_open_interest(reading: &OpenInterestReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::OpenInterest;
    let change_pct = finite(kind, "change_pct", reading.change_pct)?;
    let oi_value = finite_opt(kind, "oi_value", reading.oi_value)?;

    Ok(ScoredReading::new(kind, open_interest_score(change_pct))
        .value("OI_value", oi_value)
        .value("change_pct", change_pct)
        .meta("trend", open_interest_trend(change_pct)))
}

pub fn score_long_short(reading: &LongShortReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::LongShortRatio;
    let ratio = positive(kind, "ratio", reading.ratio)?;
    let long_pct = finite_opt(kind, "long_pct", reading.long_pct)?;

    Ok(ScoredReading::new(kind, long_short_score(ratio))
        .value("ratio", ratio)
        .value("long_pct", long_pct)
        .meta("trend", long_short_trend(ratio)))
}

pub fn score_taker(reading: &TakerReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::Taker;
    let ratio = positive(kind, "ratio", reading.ratio)?;
    let buy_vol = finite_opt(kind, "buy_vol", reading.buy_vol)?;
    let sell_vol = finite_opt(kind, "sell_vol", reading.sell_vol)?;

    Ok(ScoredReading::new(kind, taker_score(ratio))
        .value("ratio", ratio)
        .value("buy_vol", buy_vol)
        .value("sell_vol", sell_vol)
        .meta("pressure", taker_pressure(ratio)))
}
