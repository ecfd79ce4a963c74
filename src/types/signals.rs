use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Score above which a signal is bullish.
pub const BULLISH_THRESHOLD: f64 = 0.2;
/// Score below which a signal is bearish.
pub const BEARISH_THRESHOLD: f64 = -0.2;

/// Direction of a scored signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    /// Classify a continuous score. Used for both indicator and overall scores.
    pub fn classify(score: f64) -> Self {
        if score > BULLISH_THRESHOLD {
            Signal::Bullish
        } else if score < BEARISH_THRESHOLD {
            Signal::Bearish
        } else {
            Signal::Neutral
        }
    }

    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Bullish => "bullish",
            Signal::Bearish => "bearish",
            Signal::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analytical dimension an indicator is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Momentum,
    Trend,
    Volatility,
    Volume,
    Derivatives,
}

impl Group {
    /// All groups in aggregation order.
    pub const ALL: [Group; 5] = [
        Group::Momentum,
        Group::Trend,
        Group::Volatility,
        Group::Volume,
        Group::Derivatives,
    ];

    /// Group weight in basis points. The five weights sum to 10_000.
    pub fn weight_bps(&self) -> u32 {
        match self {
            Group::Momentum => 2_500,
            Group::Trend => 2_000,
            Group::Volatility => 1_500,
            Group::Volume => 1_000,
            Group::Derivatives => 3_000,
        }
    }

    /// Group weight as a fraction of the composite score.
    pub fn weight(&self) -> f64 {
        self.weight_bps() as f64 / 10_000.0
    }

    /// Indicators belonging to this group, in evaluation order.
    pub fn members(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.group() == *self)
            .collect()
    }

    /// Get display name for this group.
    pub fn name(&self) -> &'static str {
        match self {
            Group::Momentum => "Momentum",
            Group::Trend => "Trend",
            Group::Volatility => "Volatility",
            Group::Volume => "Volume",
            Group::Derivatives => "Derivatives",
        }
    }
}

/// Every indicator the composite score knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "KD")]
    Kd,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "EMA")]
    Ema,
    #[serde(rename = "BBANDS")]
    Bbands,
    #[serde(rename = "Volume")]
    Volume,
    #[serde(rename = "OI")]
    OpenInterest,
    #[serde(rename = "LS_Ratio")]
    LongShortRatio,
    #[serde(rename = "Taker")]
    Taker,
}

impl IndicatorKind {
    /// Fixed output order of indicator signals.
    pub const ALL: [IndicatorKind; 9] = [
        IndicatorKind::Rsi,
        IndicatorKind::Kd,
        IndicatorKind::Macd,
        IndicatorKind::Ema,
        IndicatorKind::Bbands,
        IndicatorKind::Volume,
        IndicatorKind::OpenInterest,
        IndicatorKind::LongShortRatio,
        IndicatorKind::Taker,
    ];

    /// Wire name, as consumed by the dashboard.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Kd => "KD",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Bbands => "BBANDS",
            IndicatorKind::Volume => "Volume",
            IndicatorKind::OpenInterest => "OI",
            IndicatorKind::LongShortRatio => "LS_Ratio",
            IndicatorKind::Taker => "Taker",
        }
    }

    /// Parse from a wire name or a lower-case alias.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rsi" => Some(Self::Rsi),
            "kd" | "stochastic" => Some(Self::Kd),
            "macd" => Some(Self::Macd),
            "ema" => Some(Self::Ema),
            "bbands" | "bollinger" => Some(Self::Bbands),
            "volume" | "obv" => Some(Self::Volume),
            "oi" | "open_interest" => Some(Self::OpenInterest),
            "ls_ratio" | "long_short_ratio" => Some(Self::LongShortRatio),
            "taker" | "taker_volume" => Some(Self::Taker),
            _ => None,
        }
    }

    /// Group this indicator is averaged in.
    pub fn group(&self) -> Group {
        match self {
            IndicatorKind::Rsi | IndicatorKind::Kd | IndicatorKind::Macd => Group::Momentum,
            IndicatorKind::Ema => Group::Trend,
            IndicatorKind::Bbands => Group::Volatility,
            IndicatorKind::Volume => Group::Volume,
            IndicatorKind::OpenInterest | IndicatorKind::LongShortRatio | IndicatorKind::Taker => {
                Group::Derivatives
            }
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scored output for a single indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSignal {
    /// Indicator wire name (e.g. "RSI", "LS_Ratio").
    pub name: IndicatorKind,
    /// Signal direction derived from the continuous score.
    pub signal: Signal,
    /// Magnitude of the continuous score, 0.0 to 1.0.
    pub strength: f64,
    /// Continuous score from -1.0 (bearish) to +1.0 (bullish).
    pub continuous_score: f64,
    /// Raw values the score was computed from.
    pub latest_values: BTreeMap<String, Option<f64>>,
    /// Indicator-specific labels (trend, pressure, crosses).
    pub metadata: Map<String, Value>,
}

/// Band describing how strongly indicators agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusBand {
    HighlyAligned,
    ModeratelyAligned,
    HighlyDivergent,
}

impl ConsensusBand {
    /// Classify a consensus value. Thresholds at 0.8 and 0.5.
    pub fn from_consensus(consensus: f64) -> Self {
        if consensus >= 0.8 {
            ConsensusBand::HighlyAligned
        } else if consensus >= 0.5 {
            ConsensusBand::ModeratelyAligned
        } else {
            ConsensusBand::HighlyDivergent
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            ConsensusBand::HighlyAligned => "Highly aligned",
            ConsensusBand::ModeratelyAligned => "Moderately aligned",
            ConsensusBand::HighlyDivergent => "Highly divergent",
        }
    }
}

/// Composite outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    /// Weighted sum of group averages, -1.0 to +1.0.
    pub overall_score: f64,
    /// Signal classified from the overall score.
    pub overall_signal: Signal,
    /// 1 - population stddev of all indicator scores. Not clamped.
    pub consensus: f64,
}

impl CompositeResult {
    /// Agreement band for this result's consensus.
    pub fn consensus_band(&self) -> ConsensusBand {
        ConsensusBand::from_consensus(self.consensus)
    }
}

/// Average of one group's available indicator scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group: Group,
    pub weight: f64,
    /// None when no indicator in the group was available.
    pub average: Option<f64>,
    /// Number of indicators that contributed.
    pub count: usize,
}

/// Full output of one evaluation: per-indicator signals plus the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub indicators: Vec<IndicatorSignal>,
    pub composite: CompositeResult,
    pub groups: Vec<GroupScore>,
}

/// Analysis timeframe requested by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    #[default]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Timeframe {
    pub const ALL: [Timeframe; 9] = [
        Timeframe::FifteenMinutes,
        Timeframe::ThirtyMinutes,
        Timeframe::OneHour,
        Timeframe::TwoHours,
        Timeframe::FourHours,
        Timeframe::TwelveHours,
        Timeframe::OneDay,
        Timeframe::ThreeDays,
        Timeframe::OneWeek,
    ];

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|tf| tf.as_str() == s)
    }

    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::TwoHours => "2h",
            Self::FourHours => "4h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
            Self::ThreeDays => "3d",
            Self::OneWeek => "1w",
        }
    }

    /// How long an evaluation for this timeframe stays fresh.
    ///
    /// Only 1h and 4h get the short TTL; every other timeframe keeps 5 minutes.
    pub fn cache_ttl_secs(&self) -> u64 {
        match self {
            Self::OneHour | Self::FourHours => 60,
            _ => 300,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
