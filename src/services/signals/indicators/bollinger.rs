//! Bollinger Bands %B reading.

use super::align;
use crate::services::signals::ReadingSource;
use crate::types::{BbandsReading, IndicatorKind, IndicatorReading, OhlcPoint};

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(period)
/// - Upper band: SMA + k * StdDev
/// - Lower band: SMA - k * StdDev
///
/// %B places the latest close within the bands: 0 at the lower band,
/// 1 at the upper band.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Population standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl BollingerBands {
    /// Upper, middle and lower band over one window of closes.
    fn bands(&self, window: &[OhlcPoint]) -> (f64, f64, f64) {
        let closes: Vec<f64> = window.iter().map(|c| c.close).collect();
        let middle = closes.iter().sum::<f64>() / closes.len() as f64;
        let band = Self::std_dev(&closes, middle) * self.std_dev_multiplier;
        (middle + band, middle, middle - band)
    }
}

impl ReadingSource for BollingerBands {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Bbands
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading> {
        if self.period == 0 || candles.len() < self.period {
            return None;
        }

        let (upper, middle, lower) = self.bands(&candles[candles.len() - self.period..]);
        let close = candles[candles.len() - 1].close;

        let percent_b = if upper > lower {
            (close - lower) / (upper - lower)
        } else {
            0.5
        };

        Some(IndicatorReading::Bbands(BbandsReading {
            percent_b,
            upper: Some(upper),
            middle: Some(middle),
            lower: Some(lower),
        }))
    }

    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)> {
        let (mut upper, mut middle, mut lower) = (Vec::new(), Vec::new(), Vec::new());
        if self.period > 0 {
            for window in candles.windows(self.period) {
                let (u, m, l) = self.bands(window);
                upper.push(u);
                middle.push(m);
                lower.push(l);
            }
        }

        let len = candles.len();
        vec![
            ("upper", align(&upper, len)),
            ("middle", align(&middle, len)),
            ("lower", align(&lower, len)),
        ]
    }
}
