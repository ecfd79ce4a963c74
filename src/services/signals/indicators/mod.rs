//! Reading sources that derive indicator readings from OHLC candles.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod stochastic;

pub use bollinger::BollingerBands;
pub use ema::EmaCross;
pub use macd::Macd;
pub use obv::Obv;
pub use rsi::Rsi;
pub use stochastic::Stochastic;

use tracing::debug;

use super::ReadingSource;
use crate::config::IndicatorParams;
use crate::types::{IndicatorKind, IndicatorSeries, OhlcPoint, ReadingBundle, SeriesPoint};

/// Get all candle-derived sources, configured with the given periods.
pub fn all_sources(params: &IndicatorParams) -> Vec<Box<dyn ReadingSource>> {
    vec![
        // Momentum
        Box::new(Rsi::new(params.rsi_period)),
        Box::new(Stochastic::new(params.kd_k_period, params.kd_d_period)),
        Box::new(Macd::new(
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        )),
        // Trend
        Box::new(EmaCross::new(params.ema_fast, params.ema_slow)),
        // Volatility
        Box::new(BollingerBands::new(params.bb_period, params.bb_std_dev)),
        // Volume
        Box::new(Obv::new(params.volume_ma_period, params.volume_lookback)),
    ]
}

/// Derive every reading the candles support.
///
/// Sources without enough history are left out of the bundle.
pub fn readings_from_candles(candles: &[OhlcPoint], params: &IndicatorParams) -> ReadingBundle {
    let mut bundle = ReadingBundle::new();

    for source in all_sources(params) {
        match source.reading(candles) {
            Some(reading) => bundle.insert(reading),
            None => debug!(
                "Not enough data for {} ({} candles, need {})",
                source.kind(),
                candles.len(),
                source.min_periods()
            ),
        }
    }

    bundle
}

/// Full per-bar lines for one candle-derived indicator.
///
/// None for indicators that are not derived from candles (OI, LS_Ratio,
/// Taker).
pub fn indicator_series(
    candles: &[OhlcPoint],
    kind: IndicatorKind,
    params: &IndicatorParams,
) -> Option<IndicatorSeries> {
    let source = all_sources(params)
        .into_iter()
        .find(|source| source.kind() == kind)?;

    let lines = source
        .lines(candles)
        .into_iter()
        .map(|(name, values)| {
            let points = candles
                .iter()
                .zip(values)
                .map(|(candle, value)| SeriesPoint {
                    time: candle.time,
                    value,
                })
                .collect();
            (name.to_string(), points)
        })
        .collect();

    Some(IndicatorSeries { name: kind, lines })
}

/// Front-pad a series with None so element `i` lines up with bar `i` of a
/// `len`-bar history. Non-finite values become None.
pub(crate) fn align(values: &[f64], len: usize) -> Vec<Option<f64>> {
    let pad = len.saturating_sub(values.len());
    std::iter::repeat(None)
        .take(pad)
        .chain(values.iter().map(|v| v.is_finite().then_some(*v)))
        .collect()
}

/// EMA series seeded with the SMA of the first `period` values.
///
/// Element `i` corresponds to `values[i + period - 1]`. Empty when there
/// are fewer than `period` values.
pub(crate) fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    ema.push(current);

    for value in &values[period..] {
        current = (value - current) * multiplier + current;
        ema.push(current);
    }

    ema
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_series_seeded_with_sma() {
        let series = ema_series(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], 2.0);
        // (4 - 2) * 0.5 + 2
        assert_eq!(series[1], 3.0);
        assert!(ema_series(&[1.0, 2.0], 3).is_empty());
    }

    #[test]
    fn test_all_sources_cover_candle_indicators() {
        let kinds: Vec<IndicatorKind> = all_sources(&IndicatorParams::default())
            .iter()
            .map(|s| s.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                IndicatorKind::Rsi,
                IndicatorKind::Kd,
                IndicatorKind::Macd,
                IndicatorKind::Ema,
                IndicatorKind::Bbands,
                IndicatorKind::Volume,
            ]
        );
    }

    #[test]
    fn test_readings_from_long_history() {
        let candles = test_candles::uptrend(60);
        let bundle = readings_from_candles(&candles, &IndicatorParams::default());
        assert_eq!(bundle.len(), 6);
        assert!(bundle.open_interest.is_none());
    }

    #[test]
    fn test_short_history_leaves_out_slow_indicators() {
        let candles = test_candles::uptrend(20);
        let bundle = readings_from_candles(&candles, &IndicatorParams::default());
        assert!(bundle.rsi.is_some());
        assert!(bundle.kd.is_some());
        assert!(bundle.macd.is_none());
        assert!(bundle.ema.is_none());
    }

    #[test]
    fn test_align_pads_front_and_drops_nan() {
        assert_eq!(
            align(&[1.0, f64::NAN, 3.0], 5),
            vec![None, None, Some(1.0), None, Some(3.0)]
        );
        assert_eq!(align(&[], 2), vec![None, None]);
    }

    #[test]
    fn test_indicator_series_points_carry_candle_times() {
        let candles = test_candles::uptrend(40);
        let series =
            indicator_series(&candles, IndicatorKind::Macd, &IndicatorParams::default()).unwrap();

        assert_eq!(series.name, IndicatorKind::Macd);
        assert_eq!(series.lines.len(), 3);
        let macd = &series.lines["macd"];
        assert_eq!(macd.len(), 40);
        assert_eq!(macd[0].time, candles[0].time);
        assert_eq!(macd[0].value, None);
        assert!(macd[39].value.is_some());
    }

    #[test]
    fn test_indicator_series_only_for_candle_indicators() {
        let candles = test_candles::uptrend(40);
        let params = IndicatorParams::default();
        assert!(indicator_series(&candles, IndicatorKind::OpenInterest, &params).is_none());
        assert!(indicator_series(&candles, IndicatorKind::Taker, &params).is_none());
        for source in all_sources(&params) {
            assert!(indicator_series(&candles, source.kind(), &params).is_some());
        }
    }
}
