//! Stochastic Oscillator (KD) reading.

use super::align;
use crate::services::signals::ReadingSource;
use crate::types::{IndicatorKind, IndicatorReading, KdReading, OhlcPoint};

/// Stochastic Oscillator.
///
/// %K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100 over
/// `k_period` bars; %D is the SMA of %K over `d_period` bars. The previous
/// bar's %K/%D is included so the scorer can detect crosses.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }

    /// %K for every bar with a full window.
    fn k_values(&self, candles: &[OhlcPoint]) -> Vec<f64> {
        if self.k_period == 0 {
            return Vec::new();
        }

        candles
            .windows(self.k_period)
            .map(|window| {
                let lowest_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
                let highest_high = window
                    .iter()
                    .map(|c| c.high)
                    .fold(f64::NEG_INFINITY, f64::max);
                let close = window[window.len() - 1].close;

                if highest_high != lowest_low {
                    (close - lowest_low) / (highest_high - lowest_low) * 100.0
                } else {
                    50.0
                }
            })
            .collect()
    }

    /// %D: SMA of %K over `d_period` bars.
    fn d_values(&self, k_values: &[f64]) -> Vec<f64> {
        if self.d_period == 0 {
            return Vec::new();
        }

        k_values
            .windows(self.d_period)
            .map(|window| window.iter().sum::<f64>() / self.d_period as f64)
            .collect()
    }
}

impl ReadingSource for Stochastic {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Kd
    }

    fn min_periods(&self) -> usize {
        self.k_period + self.d_period
    }

    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let k_values = self.k_values(candles);
        let d_values = self.d_values(&k_values);
        let (k, d) = (k_values.len(), d_values.len());
        if d < 2 {
            return None;
        }

        Some(IndicatorReading::Kd(KdReading {
            k: k_values[k - 1],
            d: d_values[d - 1],
            k_prev: Some(k_values[k - 2]),
            d_prev: Some(d_values[d - 2]),
        }))
    }

    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)> {
        let k_values = self.k_values(candles);
        let d_values = self.d_values(&k_values);
        vec![
            ("K", align(&k_values, candles.len())),
            ("D", align(&d_values, candles.len())),
        ]
    }
}
