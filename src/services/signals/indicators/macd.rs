//! MACD (Moving Average Convergence Divergence) reading.

use super::{align, ema_series};
use crate::services::signals::ReadingSource;
use crate::types::{IndicatorKind, IndicatorReading, MacdReading, OhlcPoint};

/// MACD indicator.
///
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(signal) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl Macd {
    /// MACD line and its signal line.
    ///
    /// Element `i` of the MACD line is bar `i + slow - 1`; the signal line
    /// starts `signal - 1` elements later.
    fn macd_lines(&self, closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
        if self.fast_period == 0
            || self.fast_period > self.slow_period
            || closes.len() < self.slow_period
        {
            return (Vec::new(), Vec::new());
        }

        let fast_ema = ema_series(closes, self.fast_period);
        let slow_ema = ema_series(closes, self.slow_period);

        // Align both series on the bars where the slow EMA exists.
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = slow_ema
            .iter()
            .zip(&fast_ema[offset..])
            .map(|(slow, fast)| fast - slow)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal_period);
        (macd_line, signal_line)
    }
}

impl ReadingSource for Macd {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let (macd_line, signal_line) = self.macd_lines(&closes);
        let (m, s) = (macd_line.len(), signal_line.len());
        if s < 2 {
            return None;
        }

        Some(IndicatorReading::Macd(MacdReading {
            macd: macd_line[m - 1],
            signal: signal_line[s - 1],
            close: closes[closes.len() - 1],
            histogram_prev: Some(macd_line[m - 2] - signal_line[s - 2]),
        }))
    }

    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let (macd_line, signal_line) = self.macd_lines(&closes);
        let skip = macd_line.len() - signal_line.len();
        let histogram: Vec<f64> = macd_line[skip..]
            .iter()
            .zip(&signal_line)
            .map(|(macd, signal)| macd - signal)
            .collect();

        let len = candles.len();
        vec![
            ("macd", align(&macd_line, len)),
            ("signal", align(&signal_line, len)),
            ("histogram", align(&histogram, len)),
        ]
    }
}
