//! RSI, KD and MACD score mappings.

use super::{finite, finite_opt, positive, within, ScoredReading};
use crate::error::ScoreError;
use crate::services::signals::clamp_score;
use crate::types::{IndicatorKind, KdReading, MacdReading, RsiReading};

/// Stochastic line cross on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cross {
    Golden,
    Death,
    None,
}

impl Cross {
    /// Detect a fast-over-slow cross between the previous and current bar.
    pub fn detect(fast: f64, slow: f64, prev: Option<(f64, f64)>) -> Self {
        match prev {
            Some((fast_prev, slow_prev)) if fast > slow && fast_prev <= slow_prev => Cross::Golden,
            Some((fast_prev, slow_prev)) if fast < slow && fast_prev >= slow_prev => Cross::Death,
            _ => Cross::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cross::Golden => "golden",
            Cross::Death => "death",
            Cross::None => "none",
        }
    }
}

/// RSI to score: linear through 30 → +0.4, 50 → 0, 70 → -0.4.
///
/// Slope is 0.02 per RSI point on both sides of the anchors, so
/// RSI 0 maps to +1.0 and RSI 100 to -1.0.
pub fn rsi_score(rsi: f64) -> f64 {
    clamp_score((50.0 - rsi) / 20.0 * 0.4)
}

/// %K zone score plus a ±0.3 bonus for a fresh K/D cross.
pub fn kd_score(k: f64, cross: Cross) -> f64 {
    let base = if k <= 20.0 {
        0.3 + (20.0 - k) / 20.0 * 0.4
    } else if k <= 50.0 {
        (50.0 - k) / 30.0 * 0.3
    } else if k <= 80.0 {
        -(k - 50.0) / 30.0 * 0.3
    } else {
        -(0.3 + (k - 80.0) / 20.0 * 0.4)
    };

    match cross {
        Cross::Golden => clamp_score(base + 0.3),
        Cross::Death => clamp_score(base - 0.3),
        Cross::None => clamp_score(base),
    }
}

/// Histogram as a percentage of price through tanh, boosted when the
/// histogram is expanding and damped when it is contracting.
pub fn macd_score(histogram: f64, histogram_prev: Option<f64>, close: f64) -> f64 {
    let hist_pct = histogram / close * 100.0;
    let mut base = (hist_pct * 2.0).tanh();

    if let Some(prev) = histogram_prev {
        match histogram_momentum(histogram, prev) {
            HistogramMomentum::Expanding => base *= 1.15,
            HistogramMomentum::Contracting => base *= 0.85,
            HistogramMomentum::Flat => {}
        }
    }

    clamp_score(base)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistogramMomentum {
    Expanding,
    Contracting,
    Flat,
}

impl HistogramMomentum {
    fn as_str(&self) -> &'static str {
        match self {
            HistogramMomentum::Expanding => "expanding",
            HistogramMomentum::Contracting => "contracting",
            HistogramMomentum::Flat => "flat",
        }
    }
}

fn histogram_momentum(now: f64, prev: f64) -> HistogramMomentum {
    if (now > 0.0 && now > prev) || (now < 0.0 && now < prev) {
        HistogramMomentum::Expanding
    } else if (now > 0.0 && now < prev) || (now < 0.0 && now > prev) {
        HistogramMomentum::Contracting
    } else {
        HistogramMomentum::Flat
    }
}

pub fn score_rsi(reading: &RsiReading) -> Result<ScoredReading, ScoreError> {
    let rsi = within(IndicatorKind::Rsi, "value", reading.value, 0.0, 100.0)?;

    let zone = if rsi < 30.0 {
        "oversold"
    } else if rsi > 70.0 {
        "overbought"
    } else {
        "neutral"
    };

    Ok(ScoredReading::new(IndicatorKind::Rsi, rsi_score(rsi))
        .value("rsi", rsi)
        .meta("zone", zone))
}

pub fn score_kd(reading: &KdReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::Kd;
    let k = within(kind, "k", reading.k, 0.0, 100.0)?;
    let d = within(kind, "d", reading.d, 0.0, 100.0)?;
    let k_prev = finite_opt(kind, "k_prev", reading.k_prev)?;
    let d_prev = finite_opt(kind, "d_prev", reading.d_prev)?;

    let cross = Cross::detect(k, d, k_prev.zip(d_prev));

    Ok(ScoredReading::new(kind, kd_score(k, cross))
        .value("K", k)
        .value("D", d)
        .meta("cross", cross.as_str()))
}

pub fn score_macd(reading: &MacdReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::Macd;
    let macd = finite(kind, "macd", reading.macd)?;
    let signal = finite(kind, "signal", reading.signal)?;
    let close = positive(kind, "close", reading.close)?;
    let histogram_prev = finite_opt(kind, "histogram_prev", reading.histogram_prev)?;

    let histogram = reading.histogram();
    let momentum = histogram_prev
        .map(|prev| histogram_momentum(histogram, prev))
        .unwrap_or(HistogramMomentum::Flat);

    Ok(
        ScoredReading::new(kind, macd_score(histogram, histogram_prev, close))
            .value("macd", macd)
            .value("signal", signal)
            .value("histogram", histogram)
            .meta("histogram_trend", momentum.as_str()),
    )
}
