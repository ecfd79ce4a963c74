//! Volume/OBV score mapping.

use super::{finite, ScoredReading};
use crate::error::ScoreError;
use crate::services::signals::clamp_score;
use crate::types::{IndicatorKind, VolumeReading};

/// OBV direction weighted by relative volume.
///
/// When OBV and price move the same way the score leans fully in the OBV
/// direction (base ±0.2 plus up to ±0.6 from relative volume). When they
/// diverge, the OBV direction is kept at a reduced weight.
pub fn volume_score(obv_rising: bool, price_rising: bool, volume_ratio: f64) -> f64 {
    let obv_dir = if obv_rising { 1.0 } else { -1.0 };
    let expansion = ((volume_ratio - 1.0) * 1.5).tanh();

    let score = if obv_rising == price_rising {
        obv_dir * expansion * 0.6 + obv_dir * 0.2
    } else {
        obv_dir * 0.3 * expansion
    };

    clamp_score(score)
}

pub fn score_volume(reading: &VolumeReading) -> Result<ScoredReading, ScoreError> {
    let kind = IndicatorKind::Volume;
    let volume = finite(kind, "volume", reading.volume)?;
    let volume_ma = finite(kind, "volume_ma", reading.volume_ma)?;
    let obv = finite(kind, "obv", reading.obv)?;
    let obv_prev = finite(kind, "obv_prev", reading.obv_prev)?;
    let close = finite(kind, "close", reading.close)?;
    let close_prev = finite(kind, "close_prev", reading.close_prev)?;

    if volume < 0.0 || volume_ma < 0.0 {
        return Err(ScoreError::invalid(kind, "volume must not be negative"));
    }

    let obv_rising = obv > obv_prev;
    let price_rising = close > close_prev;
    let volume_ratio = reading.volume_ratio();

    Ok(
        ScoredReading::new(kind, volume_score(obv_rising, price_rising, volume_ratio))
            .value("volume", volume)
            .value("volume_ma", volume_ma)
            .value("obv", obv)
            .meta("obv_trend", if obv_rising { "rising" } else { "falling" })
            .meta("volume_ratio", (volume_ratio * 100.0).round() / 100.0)
            .meta("price_confirms", obv_rising == price_rising),
    )
}
