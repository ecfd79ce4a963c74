//! Readings derived from futures market histories.

use crate::types::{
    DerivativesData, IndicatorReading, LongShortPoint, LongShortReading, OpenInterestPoint,
    OpenInterestReading, TakerReading, TakerVolumePoint,
};

/// Percentage change in open interest value across the window.
///
/// Zero when the first sample has no value to compare against.
pub fn open_interest_change(history: &[OpenInterestPoint]) -> Option<OpenInterestReading> {
    let first = history.first()?;
    let last = history.last()?;

    let change_pct = if first.open_interest_value > 0.0 {
        (last.open_interest_value - first.open_interest_value) / first.open_interest_value * 100.0
    } else {
        0.0
    };

    Some(OpenInterestReading {
        change_pct,
        oi_value: Some(last.open_interest_value),
    })
}

/// Latest account long/short ratio.
pub fn latest_long_short(history: &[LongShortPoint]) -> Option<LongShortReading> {
    history.last().map(|point| LongShortReading {
        ratio: point.long_short_ratio,
        long_pct: Some(point.long_account),
    })
}

/// Latest taker buy/sell ratio.
pub fn latest_taker(history: &[TakerVolumePoint]) -> Option<TakerReading> {
    history.last().map(|point| TakerReading {
        ratio: point.buy_sell_ratio,
        buy_vol: Some(point.buy_vol),
        sell_vol: Some(point.sell_vol),
    })
}

/// All derivatives readings the histories support. Empty histories
/// contribute nothing.
pub fn derivatives_readings(data: &DerivativesData) -> Vec<IndicatorReading> {
    let mut readings = Vec::new();

    if let Some(oi) = open_interest_change(&data.open_interest) {
        readings.push(IndicatorReading::OpenInterest(oi));
    }
    if let Some(ls) = latest_long_short(&data.long_short) {
        readings.push(IndicatorReading::LongShortRatio(ls));
    }
    if let Some(taker) = latest_taker(&data.taker_volume) {
        readings.push(IndicatorReading::Taker(taker));
    }

    readings
}
