//! Fast/slow EMA cross reading.

use super::{align, ema_series};
use crate::services::signals::ReadingSource;
use crate::types::{EmaReading, IndicatorKind, IndicatorReading, OhlcPoint};

/// Pair of exponential moving averages.
///
/// Fast above slow is an uptrend; the previous bar is included so a fresh
/// cross can be detected.
pub struct EmaCross {
    fast_period: usize,
    slow_period: usize,
}

impl Default for EmaCross {
    fn default() -> Self {
        Self {
            fast_period: 9,
            slow_period: 21,
        }
    }
}

impl EmaCross {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
        }
    }
}

impl ReadingSource for EmaCross {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }

    fn min_periods(&self) -> usize {
        self.slow_period.max(self.fast_period) + 1
    }

    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = ema_series(&closes, self.fast_period);
        let slow = ema_series(&closes, self.slow_period);
        let (f, s) = (fast.len(), slow.len());
        if f < 2 || s < 2 {
            return None;
        }

        Some(IndicatorReading::Ema(EmaReading {
            fast: fast[f - 1],
            slow: slow[s - 1],
            fast_prev: Some(fast[f - 2]),
            slow_prev: Some(slow[s - 2]),
        }))
    }

    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        vec![
            ("ema_fast", align(&ema_series(&closes, self.fast_period), closes.len())),
            ("ema_slow", align(&ema_series(&closes, self.slow_period), closes.len())),
        ]
    }
}
