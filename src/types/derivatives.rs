use serde::{Deserialize, Serialize};

/// One open interest sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenInterestPoint {
    pub time: i64,
    /// Open interest in contracts.
    pub open_interest: f64,
    /// Open interest in quote currency.
    pub open_interest_value: f64,
}

/// One account long/short ratio sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongShortPoint {
    pub time: i64,
    pub long_short_ratio: f64,
    /// Share of accounts net long (0-1).
    pub long_account: f64,
    /// Share of accounts net short (0-1).
    pub short_account: f64,
}

/// One taker buy/sell volume sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakerVolumePoint {
    pub time: i64,
    pub buy_sell_ratio: f64,
    pub buy_vol: f64,
    pub sell_vol: f64,
}

/// Derivatives histories for one symbol. Any of them may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivativesData {
    #[serde(default)]
    pub open_interest: Vec<OpenInterestPoint>,
    #[serde(default)]
    pub long_short: Vec<LongShortPoint>,
    #[serde(default)]
    pub taker_volume: Vec<TakerVolumePoint>,
}
