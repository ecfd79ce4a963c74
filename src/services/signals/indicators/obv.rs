//! On-Balance Volume (OBV) reading.

use super::align;
use crate::services::signals::ReadingSource;
use crate::types::{IndicatorKind, IndicatorReading, OhlcPoint, VolumeReading};

/// OBV and relative volume.
///
/// Cumulative volume indicator:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
///
/// OBV and price are compared with the bar `lookback` bars earlier; volume
/// is compared with its `ma_period` moving average.
pub struct Obv {
    ma_period: usize,
    lookback: usize,
}

impl Default for Obv {
    fn default() -> Self {
        Self {
            ma_period: 20,
            lookback: 4,
        }
    }
}

impl Obv {
    pub fn new(ma_period: usize, lookback: usize) -> Self {
        Self {
            ma_period,
            lookback,
        }
    }
}

impl Obv {
    /// Cumulative OBV, starting at 0 on the first bar.
    fn obv_series(candles: &[OhlcPoint], volumes: &[f64]) -> Vec<f64> {
        let mut obv = 0.0;
        let mut obv_values = Vec::with_capacity(candles.len());
        if candles.is_empty() {
            return obv_values;
        }
        obv_values.push(obv);

        for (pair, volume) in candles.windows(2).zip(&volumes[1..]) {
            if pair[1].close > pair[0].close {
                obv += volume;
            } else if pair[1].close < pair[0].close {
                obv -= volume;
            }
            obv_values.push(obv);
        }

        obv_values
    }

    fn volumes(candles: &[OhlcPoint]) -> Vec<f64> {
        candles.iter().map(|c| c.volume.unwrap_or(0.0)).collect()
    }
}

impl ReadingSource for Obv {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Volume
    }

    fn min_periods(&self) -> usize {
        self.lookback + 1
    }

    fn reading(&self, candles: &[OhlcPoint]) -> Option<IndicatorReading> {
        if self.lookback == 0 || candles.len() < self.min_periods() {
            return None;
        }

        let volumes = Self::volumes(candles);
        // Some feeds carry no volume at all.
        if volumes.iter().sum::<f64>() == 0.0 {
            return None;
        }

        let obv_values = Self::obv_series(candles, &volumes);
        let last = candles.len() - 1;
        let prev = last - self.lookback;
        let volume = volumes[last];

        // Short histories compare against the latest bar itself.
        let volume_ma = if self.ma_period > 0 && volumes.len() >= self.ma_period {
            volumes[volumes.len() - self.ma_period..].iter().sum::<f64>() / self.ma_period as f64
        } else {
            volume
        };

        Some(IndicatorReading::Volume(VolumeReading {
            volume,
            volume_ma,
            obv: obv_values[last],
            obv_prev: obv_values[prev],
            close: candles[last].close,
            close_prev: candles[prev].close,
        }))
    }

    fn lines(&self, candles: &[OhlcPoint]) -> Vec<(&'static str, Vec<Option<f64>>)> {
        let volumes = Self::volumes(candles);
        let obv_values = Self::obv_series(candles, &volumes);
        let volume_ma: Vec<f64> = if self.ma_period > 0 {
            volumes
                .windows(self.ma_period)
                .map(|window| window.iter().sum::<f64>() / self.ma_period as f64)
                .collect()
        } else {
            Vec::new()
        };

        vec![
            (
                "volume",
                candles
                    .iter()
                    .map(|c| c.volume.filter(|v| v.is_finite()))
                    .collect::<Vec<_>>(),
            ),
            ("obv", align(&obv_values, candles.len())),
            ("volume_ma", align(&volume_ma, candles.len())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_candles::{downtrend, flat, uptrend};

    fn volume(candles: &[OhlcPoint]) -> VolumeReading {
        match Obv::default().reading(candles) {
            Some(IndicatorReading::Volume(r)) => r,
            other => panic!("expected Volume reading, got {:?}", other),
        }
    }

    #[test]
    fn test_obv_uptrend_rising() {
        let reading = volume(&uptrend(30));
        assert!(reading.obv > reading.obv_prev);
        assert!(reading.close > reading.close_prev);
        assert!(reading.volume > reading.volume_ma);
    }

    #[test]
    fn test_obv_downtrend_falling() {
        let reading = volume(&downtrend(30));
        assert!(reading.obv < reading.obv_prev);
        assert!(reading.close < reading.close_prev);
    }

    #[test]
    fn test_obv_without_volume_data() {
        assert!(Obv::default().reading(&flat(30)).is_none());

        let mut candles = uptrend(30);
        for candle in &mut candles {
            candle.volume = None;
        }
        assert!(Obv::default().reading(&candles).is_none());
    }

    #[test]
    fn test_obv_short_history_uses_latest_volume_as_average() {
        let reading = volume(&uptrend(6));
        assert_eq!(reading.volume, reading.volume_ma);
        assert_eq!(reading.volume_ratio(), 1.0);
    }

    #[test]
    fn test_obv_lines() {
        let candles = uptrend(30);
        let reading = volume(&candles);
        let lines = Obv::default().lines(&candles);

        let names: Vec<&str> = lines.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["volume", "obv", "volume_ma"]);
        assert_eq!(lines[0].1[0], Some(1000.0));
        assert_eq!(lines[1].1[0], Some(0.0));
        assert!(lines[2].1[18].is_none());
        assert_eq!(lines[1].1[29], Some(reading.obv));
        assert_eq!(lines[2].1[29], Some(reading.volume_ma));
    }

    #[test]
    fn test_obv_lines_keep_missing_volume_null() {
        let mut candles = uptrend(5);
        candles[2].volume = None;
        let lines = Obv::default().lines(&candles);
        assert_eq!(lines[0].1[2], None);
        assert_eq!(lines[0].1[3], Some(1030.0));
    }
}
