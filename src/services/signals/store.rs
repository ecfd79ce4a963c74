//! Memoized evaluations keyed by symbol, timeframe and input bundle.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{derivatives_readings, evaluate, indicator_series, readings_from_candles};
use crate::config::{Config, IndicatorParams};
use crate::error::ScoreError;
use crate::services::TtlCache;
use crate::types::{
    DerivativesData, Evaluation, IndicatorKind, IndicatorSeries, OhlcPoint, ReadingBundle,
    Timeframe,
};

/// An evaluation and whether it was served from the cache.
#[derive(Debug, Clone)]
pub struct StoredEvaluation {
    pub evaluation: Evaluation,
    pub cached: bool,
}

/// Store for scoring reading bundles and caching the results.
pub struct SignalStore {
    /// Cache key format: "{SYMBOL}:{timeframe}:{sha256 of bundle}"
    cache: TtlCache<Evaluation>,
    params: IndicatorParams,
    ttl_override: Option<Duration>,
}

impl SignalStore {
    /// Create a new signal store.
    pub fn new(config: &Config) -> Arc<Self> {
        Arc::new(Self {
            cache: TtlCache::new(config.cache_capacity),
            params: config.indicators.clone(),
            ttl_override: config.cache_ttl_secs.map(Duration::from_secs),
        })
    }

    /// Cache key for a bundle. None if the bundle cannot be serialized.
    pub fn cache_key(symbol: &str, timeframe: Timeframe, bundle: &ReadingBundle) -> Option<String> {
        let bytes = serde_json::to_vec(bundle).ok()?;
        let digest = Sha256::digest(&bytes);
        Some(format!(
            "{}:{}:{}",
            symbol.to_uppercase(),
            timeframe,
            hex::encode(digest)
        ))
    }

    /// How long evaluations for a timeframe are kept.
    pub fn ttl(&self, timeframe: Timeframe) -> Duration {
        self.ttl_override
            .unwrap_or_else(|| Duration::from_secs(timeframe.cache_ttl_secs()))
    }

    /// Evaluate a bundle, reusing a live cached result for identical input.
    ///
    /// Errors are never cached.
    pub fn evaluate(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bundle: &ReadingBundle,
    ) -> Result<StoredEvaluation, ScoreError> {
        let Some(key) = Self::cache_key(symbol, timeframe, bundle) else {
            warn!("Could not hash readings for {}, evaluating uncached", symbol);
            return evaluate(bundle).map(|evaluation| StoredEvaluation {
                evaluation,
                cached: false,
            });
        };

        if let Some(evaluation) = self.cache.get(&key) {
            debug!("Cache hit for {} {}", symbol, timeframe);
            return Ok(StoredEvaluation {
                evaluation,
                cached: true,
            });
        }

        let evaluation = evaluate(bundle)?;
        debug!(
            "Scored {} {} from {} indicators: {}",
            symbol,
            timeframe,
            evaluation.indicators.len(),
            evaluation.composite.overall_score
        );

        self.cache
            .insert(key, evaluation.clone(), self.ttl(timeframe));

        Ok(StoredEvaluation {
            evaluation,
            cached: false,
        })
    }

    /// Derive readings from candles and derivatives histories.
    pub fn readings(
        &self,
        candles: &[OhlcPoint],
        derivatives: Option<&DerivativesData>,
    ) -> ReadingBundle {
        let mut bundle = readings_from_candles(candles, &self.params);
        if let Some(data) = derivatives {
            for reading in derivatives_readings(data) {
                bundle.insert(reading);
            }
        }
        bundle
    }

    /// Derive readings from raw market data and evaluate them.
    pub fn analyze(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        candles: &[OhlcPoint],
        derivatives: Option<&DerivativesData>,
    ) -> Result<StoredEvaluation, ScoreError> {
        let bundle = self.readings(candles, derivatives);
        self.evaluate(symbol, timeframe, &bundle)
    }

    /// Per-bar lines for one candle-derived indicator, using the configured
    /// periods.
    pub fn series(&self, candles: &[OhlcPoint], kind: IndicatorKind) -> Option<IndicatorSeries> {
        indicator_series(candles, kind, &self.params)
    }

    /// Number of cached evaluations that are still fresh.
    pub fn cached_count(&self) -> usize {
        self.cache.live_len()
    }

    /// Drop expired evaluations.
    pub fn purge_expired(&self) {
        let removed = self.cache.purge_expired();
        if removed > 0 {
            debug!("Purged {} expired evaluations", removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmaReading, IndicatorReading, RsiReading};

    fn store() -> Arc<SignalStore> {
        SignalStore::new(&Config::default())
    }

    fn rsi_bundle(value: f64) -> ReadingBundle {
        ReadingBundle::new().with(IndicatorReading::Rsi(RsiReading { value }))
    }

    #[test]
    fn test_second_evaluation_is_cached() {
        let store = store();
        let bundle = rsi_bundle(20.0);

        let first = store.evaluate("btc", Timeframe::OneDay, &bundle).unwrap();
        let second = store.evaluate("BTC", Timeframe::OneDay, &bundle).unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.evaluation, second.evaluation);
        assert_eq!(store.cached_count(), 1);
    }

    #[test]
    fn test_key_depends_on_input() {
        let a = SignalStore::cache_key("BTC", Timeframe::OneDay, &rsi_bundle(20.0)).unwrap();
        let b = SignalStore::cache_key("BTC", Timeframe::OneDay, &rsi_bundle(21.0)).unwrap();
        let c = SignalStore::cache_key("BTC", Timeframe::FourHours, &rsi_bundle(20.0)).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("BTC:1d:"));
        assert_eq!(a.len(), "BTC:1d:".len() + 64);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let store = store();
        let result = store.evaluate("BTC", Timeframe::OneDay, &ReadingBundle::new());
        assert_eq!(result.unwrap_err(), ScoreError::EmptyInput);
        assert_eq!(store.cached_count(), 0);
    }

    #[test]
    fn test_ttl_by_timeframe_and_override() {
        let store = store();
        assert_eq!(store.ttl(Timeframe::OneHour), Duration::from_secs(60));
        assert_eq!(store.ttl(Timeframe::OneWeek), Duration::from_secs(300));

        let config = Config {
            cache_ttl_secs: Some(5),
            ..Config::default()
        };
        let store = SignalStore::new(&config);
        assert_eq!(store.ttl(Timeframe::OneDay), Duration::from_secs(5));
    }

    #[test]
    fn test_readings_merge_derivatives() {
        let store = store();
        let data = DerivativesData {
            taker_volume: vec![crate::types::TakerVolumePoint {
                time: 1,
                buy_sell_ratio: 1.2,
                buy_vol: 120.0,
                sell_vol: 100.0,
            }],
            ..Default::default()
        };
        let bundle = store.readings(&[], Some(&data));
        assert_eq!(bundle.len(), 1);
        assert!(bundle.taker.is_some());

        let evaluation = store
            .analyze("ETH", Timeframe::OneHour, &[], Some(&data))
            .unwrap()
            .evaluation;
        assert_eq!(evaluation.indicators.len(), 1);
    }

    #[test]
    fn test_analyze_without_data_is_empty() {
        let store = store();
        let bundle = ReadingBundle::new().with(IndicatorReading::Ema(EmaReading {
            fast: 1.0,
            slow: 1.0,
            fast_prev: None,
            slow_prev: None,
        }));
        assert!(store.evaluate("ETH", Timeframe::OneDay, &bundle).is_ok());
        assert_eq!(
            store.analyze("ETH", Timeframe::OneDay, &[], None).unwrap_err(),
            ScoreError::EmptyInput
        );
    }

    #[test]
    fn test_distinct_bundles_stay_within_capacity() {
        let config = Config {
            cache_capacity: 8,
            ..Config::default()
        };
        let store = SignalStore::new(&config);
        for i in 0..50 {
            let bundle = rsi_bundle(10.0 + i as f64);
            store.evaluate("BTC", Timeframe::OneDay, &bundle).unwrap();
        }
        assert_eq!(store.cached_count(), 8);

        // The newest bundle survives eviction.
        let latest = store
            .evaluate("BTC", Timeframe::OneDay, &rsi_bundle(59.0))
            .unwrap();
        assert!(latest.cached);
    }

    #[test]
    fn test_expired_evaluations_are_not_counted() {
        let config = Config {
            cache_ttl_secs: Some(0),
            ..Config::default()
        };
        let store = SignalStore::new(&config);
        store
            .evaluate("BTC", Timeframe::OneDay, &rsi_bundle(20.0))
            .unwrap();
        assert_eq!(store.cached_count(), 0);

        store.purge_expired();
        assert_eq!(store.cached_count(), 0);
    }
}
