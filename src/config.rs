use std::env;
use std::str::FromStr;

/// Look-back periods for deriving readings from candles.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub kd_k_period: usize,
    pub kd_d_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub volume_ma_period: usize,
    /// Bars back used for OBV and price direction.
    pub volume_lookback: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            kd_k_period: 14,
            kd_d_period: 3,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_fast: 9,
            ema_slow: 21,
            bb_period: 20,
            bb_std_dev: 2.0,
            volume_ma_period: 20,
            volume_lookback: 4,
        }
    }
}

impl IndicatorParams {
    /// Load periods from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let params = Self {
            rsi_period: env_or("RSI_PERIOD", defaults.rsi_period),
            kd_k_period: env_or("KD_K_PERIOD", defaults.kd_k_period),
            kd_d_period: env_or("KD_D_PERIOD", defaults.kd_d_period),
            macd_fast: env_or("MACD_FAST", defaults.macd_fast),
            macd_slow: env_or("MACD_SLOW", defaults.macd_slow),
            macd_signal: env_or("MACD_SIGNAL", defaults.macd_signal),
            ema_fast: env_or("EMA_FAST", defaults.ema_fast),
            ema_slow: env_or("EMA_SLOW", defaults.ema_slow),
            bb_period: env_or("BB_PERIOD", defaults.bb_period),
            bb_std_dev: env_or("BB_STD_DEV", defaults.bb_std_dev),
            volume_ma_period: env_or("VOLUME_MA_PERIOD", defaults.volume_ma_period),
            volume_lookback: defaults.volume_lookback,
        };

        if params.is_valid() {
            params
        } else {
            tracing::warn!("Invalid indicator periods in environment, using defaults");
            defaults
        }
    }

    /// Periods must be positive and fast periods shorter than slow ones.
    pub fn is_valid(&self) -> bool {
        let periods = [
            self.rsi_period,
            self.kd_k_period,
            self.kd_d_period,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal,
            self.ema_fast,
            self.ema_slow,
            self.bb_period,
            self.volume_ma_period,
            self.volume_lookback,
        ];
        periods.iter().all(|p| *p > 0)
            && self.macd_fast < self.macd_slow
            && self.ema_fast < self.ema_slow
            && self.bb_std_dev > 0.0
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Evaluation cache TTL override in seconds. Per-timeframe TTLs apply when unset.
    pub cache_ttl_secs: Option<u64>,
    /// Maximum number of cached evaluations.
    pub cache_capacity: usize,
    /// Seconds between sweeps of expired evaluations.
    pub cache_purge_interval_secs: u64,
    /// Indicator periods for candle-derived readings.
    pub indicators: IndicatorParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cache_ttl_secs: None,
            cache_capacity: 4096,
            cache_purge_interval_secs: 60,
            indicators: IndicatorParams::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            cache_ttl_secs: env::var("SIGNAL_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            cache_capacity: env_or("SIGNAL_CACHE_CAPACITY", defaults.cache_capacity),
            cache_purge_interval_secs: env_or(
                "SIGNAL_CACHE_PURGE_SECS",
                defaults.cache_purge_interval_secs,
            ),
            indicators: IndicatorParams::from_env(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
