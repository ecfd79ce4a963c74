//! Classic pivot-point support and resistance levels.

use crate::error::ScoreError;
use crate::types::{OhlcPoint, SupportResistanceLevel};

/// Number of most recent candles the high/low range is taken from.
pub const PIVOT_WINDOW: usize = 20;

/// Decimal places to round a level to.
///
/// Two for prices of 1 or more; sub-unit prices keep two digits past the
/// first significant one.
pub fn price_precision(price: f64) -> u32 {
    let abs = price.abs();
    if abs == 0.0 || abs >= 1.0 || !abs.is_finite() {
        return 2;
    }
    let digits = -(abs.log10().floor()) as i32 + 2;
    digits.max(2) as u32
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Pivot levels from the last candles, ordered S2, S1, PP, R1, R2.
pub fn support_resistance(candles: &[OhlcPoint]) -> Result<Vec<SupportResistanceLevel>, ScoreError> {
    let last = candles.last().ok_or(ScoreError::EmptyInput)?;
    let recent = &candles[candles.len().saturating_sub(PIVOT_WINDOW)..];

    let high = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let close = last.close;

    let pp = (high + low + close) / 3.0;
    let range = high - low;
    let decimals = price_precision(close);

    let levels = [
        ("S2", pp - range),
        ("S1", 2.0 * pp - high),
        ("PP", pp),
        ("R1", 2.0 * pp - low),
        ("R2", pp + range),
    ];

    Ok(levels
        .into_iter()
        .map(|(label, price)| SupportResistanceLevel {
            price: round_to(price, decimals),
            label: label.to_string(),
        })
        .collect())
}
