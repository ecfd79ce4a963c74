//! Raw indicator readings, as handed to the scorer.

use serde::{Deserialize, Serialize};

use super::IndicatorKind;

/// RSI value (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RsiReading {
    pub value: f64,
}

/// Stochastic %K/%D, with the previous bar for cross detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KdReading {
    pub k: f64,
    pub d: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_prev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_prev: Option<f64>,
}

/// MACD and signal line, plus the close they are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram_prev: Option<f64>,
}

impl MacdReading {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// Fast and slow EMA, with the previous bar for cross detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmaReading {
    pub fast: f64,
    pub slow: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_prev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_prev: Option<f64>,
}

/// Bollinger %B (0 = lower band, 1 = upper band).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BbandsReading {
    pub percent_b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
}

/// Volume against its moving average, and OBV/price over a look-back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeReading {
    pub volume: f64,
    pub volume_ma: f64,
    pub obv: f64,
    pub obv_prev: f64,
    pub close: f64,
    pub close_prev: f64,
}

impl VolumeReading {
    /// Current volume relative to its moving average.
    pub fn volume_ratio(&self) -> f64 {
        if self.volume_ma > 0.0 {
            self.volume / self.volume_ma
        } else {
            1.0
        }
    }
}

/// Open interest change over the sampled window, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenInterestReading {
    pub change_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oi_value: Option<f64>,
}

/// Account long/short ratio (1.0 = balanced).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongShortReading {
    pub ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_pct: Option<f64>,
}

/// Taker buy/sell volume ratio (1.0 = balanced).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TakerReading {
    pub ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_vol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_vol: Option<f64>,
}

/// One raw observation for one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorReading {
    Rsi(RsiReading),
    Kd(KdReading),
    Macd(MacdReading),
    Ema(EmaReading),
    Bbands(BbandsReading),
    Volume(VolumeReading),
    OpenInterest(OpenInterestReading),
    LongShortRatio(LongShortReading),
    Taker(TakerReading),
}

impl IndicatorReading {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorReading::Rsi(_) => IndicatorKind::Rsi,
            IndicatorReading::Kd(_) => IndicatorKind::Kd,
            IndicatorReading::Macd(_) => IndicatorKind::Macd,
            IndicatorReading::Ema(_) => IndicatorKind::Ema,
            IndicatorReading::Bbands(_) => IndicatorKind::Bbands,
            IndicatorReading::Volume(_) => IndicatorKind::Volume,
            IndicatorReading::OpenInterest(_) => IndicatorKind::OpenInterest,
            IndicatorReading::LongShortRatio(_) => IndicatorKind::LongShortRatio,
            IndicatorReading::Taker(_) => IndicatorKind::Taker,
        }
    }
}

/// Readings for one symbol and timeframe, keyed by indicator wire name.
///
/// Any entry may be absent; absent indicators are excluded from scoring.
/// Keys other than the nine wire names are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingBundle {
    #[serde(rename = "RSI", default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiReading>,
    #[serde(rename = "KD", default, skip_serializing_if = "Option::is_none")]
    pub kd: Option<KdReading>,
    #[serde(rename = "MACD", default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdReading>,
    #[serde(rename = "EMA", default, skip_serializing_if = "Option::is_none")]
    pub ema: Option<EmaReading>,
    #[serde(rename = "BBANDS", default, skip_serializing_if = "Option::is_none")]
    pub bbands: Option<BbandsReading>,
    #[serde(rename = "Volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeReading>,
    #[serde(rename = "OI", default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<OpenInterestReading>,
    #[serde(rename = "LS_Ratio", default, skip_serializing_if = "Option::is_none")]
    pub long_short_ratio: Option<LongShortReading>,
    #[serde(rename = "Taker", default, skip_serializing_if = "Option::is_none")]
    pub taker: Option<TakerReading>,
}

impl ReadingBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the reading for an indicator, if present.
    pub fn get(&self, kind: IndicatorKind) -> Option<IndicatorReading> {
        match kind {
            IndicatorKind::Rsi => self.rsi.map(IndicatorReading::Rsi),
            IndicatorKind::Kd => self.kd.map(IndicatorReading::Kd),
            IndicatorKind::Macd => self.macd.map(IndicatorReading::Macd),
            IndicatorKind::Ema => self.ema.map(IndicatorReading::Ema),
            IndicatorKind::Bbands => self.bbands.map(IndicatorReading::Bbands),
            IndicatorKind::Volume => self.volume.map(IndicatorReading::Volume),
            IndicatorKind::OpenInterest => self.open_interest.map(IndicatorReading::OpenInterest),
            IndicatorKind::LongShortRatio => {
                self.long_short_ratio.map(IndicatorReading::LongShortRatio)
            }
            IndicatorKind::Taker => self.taker.map(IndicatorReading::Taker),
        }
    }

    /// Store a reading, replacing any previous one for the same indicator.
    pub fn insert(&mut self, reading: IndicatorReading) {
        match reading {
            IndicatorReading::Rsi(r) => self.rsi = Some(r),
            IndicatorReading::Kd(r) => self.kd = Some(r),
            IndicatorReading::Macd(r) => self.macd = Some(r),
            IndicatorReading::Ema(r) => self.ema = Some(r),
            IndicatorReading::Bbands(r) => self.bbands = Some(r),
            IndicatorReading::Volume(r) => self.volume = Some(r),
            IndicatorReading::OpenInterest(r) => self.open_interest = Some(r),
            IndicatorReading::LongShortRatio(r) => self.long_short_ratio = Some(r),
            IndicatorReading::Taker(r) => self.taker = Some(r),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, reading: IndicatorReading) -> Self {
        self.insert(reading);
        self
    }

    /// Present readings, in fixed indicator order.
    pub fn readings(&self) -> Vec<IndicatorReading> {
        IndicatorKind::ALL
            .iter()
            .filter_map(|kind| self.get(*kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
