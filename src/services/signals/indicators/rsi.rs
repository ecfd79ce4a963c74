//! Relative Strength Index (RSI) reading.

use super::align;
use crate::services::signals::ReadingSource;
use crate::types::{IndicatorKind, IndicatorReading, OhlcPoint, RsiReading};

/// RSI with Wilder smoothing.
///
/// Values range from 0-100; 50 means gains and losses balance.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Wilder RSI for every bar from `period` onwards.
    ///
    /// Element `i` corresponds to `candles[i + period]`.
    fn rsi_series(candles: &[OhlcPoint], period: usize) -> Vec<f64> {
        if period == 0 || candles.len() < period + 1 {
            return Vec::new();
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = candles
            .windows(2)
            .map(|pair| {
                let change = pair[1].close - pair[0].close;
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
        let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

        let mut values = Vec::with_capacity(gains.len() - period + 1);
        values.push(Self::rsi_from_averages(avg_gain, avg_loss));

        for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
            values.push(Self::rsi_from_averages(avg_gain, avg_loss));
        }

        values
    }

    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // No movement at all is balanced, not overbought.
            return if avg_gain == 0.0 { 50.0 } else { 100.0 };
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

impl ReadingSource for Rsi {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading> {
        let value = *Self::rsi_series(candles, self.period).last()?;
        Some(IndicatorReading::Rsi(RsiReading { value }))
    }

    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)> {
        let rsi = Self::rsi_series(candles, self.period);
        vec![("rsi", align(&rsi, candles.len()))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_candles::{downtrend, flat, uptrend};

    fn rsi_value(source: &Rsi, candles: &[OhlcPoint]) -> f64 {
        match source.reading(candles) {
            Some(IndicatorReading::Rsi(r)) => r.value,
            other => panic!("expected RSI reading, got {:?}", other),
        }
    }

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 15);
        assert_eq!(Rsi::new(7).min_periods(), 8);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::default();
        assert!(rsi.reading(&uptrend(10)).is_none());
    }

    #[test]
    fn test_rsi_uptrend_high_value() {
        let value = rsi_value(&Rsi::default(), &uptrend(50));
        assert!(value > 50.0, "RSI in uptrend should be > 50, got {}", value);
        assert!(value <= 100.0);
    }

    #[test]
    fn test_rsi_downtrend_low_value() {
        let value = rsi_value(&Rsi::default(), &downtrend(50));
        assert!(value < 50.0, "RSI in downtrend should be < 50, got {}", value);
        assert!(value >= 0.0);
    }

    #[test]
    fn test_rsi_flat_market_is_balanced() {
        assert_eq!(rsi_value(&Rsi::default(), &flat(30)), 50.0);
    }

    #[test]
    fn test_rsi_custom_period() {
        let rsi = Rsi::new(7);
        assert!(rsi.reading(&uptrend(8)).is_some());
    }

    #[test]
    fn test_rsi_lines_match_reading() {
        let candles = uptrend(30);
        let rsi = Rsi::default();
        let lines = rsi.lines(&candles);

        assert_eq!(lines.len(), 1);
        let (name, values) = &lines[0];
        assert_eq!(*name, "rsi");
        assert_eq!(values.len(), 30);
        assert!(values[..14].iter().all(|v| v.is_none()));
        assert_eq!(values[29], Some(rsi_value(&rsi, &candles)));
    }
}
