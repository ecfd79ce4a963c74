//! EMA crossover score mapping.

use super::momentum::Cross;
use super::{finite, finite_opt, positive, ScoredReading};
use crate::error::ScoreError;
use crate::services::signals::clamp_score;
use crate::types::{EmaReading, IndicatorKind};

/// Fast/slow spread as a percentage of the slow EMA through tanh,
/// with ±0.2 on the bar the lines cross.
pub fn ema_score(fast: f64, slow: f64, cross: Cross) -> f64 {
    let spread_pct = (fast - slow) / slow * 100.0;
    let base = (spread_pct * 1.5).tanh();

    match cross {
        Cross::Golden => clamp_score(base + 0.2),
        Cross::Death => clamp_score(base - 0.2),
        Cross::None => clamp_score(base),
    }
}

pub fn score_ema(reading: &EmaReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::Ema;
    let fast = finite(kind, "fast", reading.fast)?;
    let slow = positive(kind, "slow", reading.slow)?;
    let fast_prev = finite_opt(kind, "fast_prev", reading.fast_prev)?;
    let slow_prev = finite_opt(kind, "slow_prev", reading.slow_prev)?;

    let cross = Cross::detect(fast, slow, fast_prev.zip(slow_prev));
    let alignment = if fast > slow {
        "bullish"
    } else if fast < slow {
        "bearish"
    } else {
        "flat"
    };

    Ok(ScoredReading::new(kind, ema_score(fast, slow, cross))
        .value("ema_fast", fast)
        .value("ema_slow", slow)
        .meta("cross", cross.as_str())
        .meta("alignment", alignment))
}
