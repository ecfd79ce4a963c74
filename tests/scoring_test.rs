//! Composite scoring behaviour, exercised through the public API.

use confluence::services::signals::{aggregate, evaluate, score_indicator, ScoringMethod};
use confluence::types::*;
use confluence::ScoreError;

fn rsi(value: f64) -> IndicatorReading {
    IndicatorReading::Rsi(RsiReading { value })
}

fn bbands(percent_b: f64) -> IndicatorReading {
    IndicatorReading::Bbands(BbandsReading {
        percent_b,
        upper: None,
        middle: None,
        lower: None,
    })
}

fn long_short(ratio: f64) -> IndicatorReading {
    IndicatorReading::LongShortRatio(LongShortReading {
        ratio,
        long_pct: None,
    })
}

fn single_score(reading: IndicatorReading) -> f64 {
    let kind = reading.kind();
    score_indicator(&ReadingBundle::new().with(reading), kind)
        .unwrap()
        .continuous_score
}

/// One bundle with every indicator, parameterised by how extreme it is.
fn full_bundle(extreme: f64) -> ReadingBundle {
    ReadingBundle {
        rsi: Some(RsiReading {
            value: 50.0 + 50.0 * extreme,
        }),
        kd: Some(KdReading {
            k: 50.0 + 50.0 * extreme,
            d: 50.0,
            k_prev: Some(40.0),
            d_prev: Some(50.0),
        }),
        macd: Some(MacdReading {
            macd: 5.0 * extreme,
            signal: 0.0,
            close: 100.0,
            histogram_prev: Some(1.0),
        }),
        ema: Some(EmaReading {
            fast: 100.0 + 30.0 * extreme,
            slow: 100.0,
            fast_prev: Some(99.0),
            slow_prev: Some(100.0),
        }),
        bbands: Some(BbandsReading {
            percent_b: 0.5 + 2.0 * extreme,
            upper: None,
            middle: None,
            lower: None,
        }),
        volume: Some(VolumeReading {
            volume: 500.0,
            volume_ma: 100.0,
            obv: 1_000.0 + 100.0 * extreme,
            obv_prev: 1_000.0,
            close: 100.0 + extreme,
            close_prev: 100.0,
        }),
        open_interest: Some(OpenInterestReading {
            change_pct: 200.0 * extreme,
            oi_value: None,
        }),
        long_short_ratio: Some(LongShortReading {
            ratio: 1.0 + 2.0 * extreme.abs(),
            long_pct: None,
        }),
        taker: Some(TakerReading {
            ratio: 1.0 + 0.9 * extreme,
            buy_vol: None,
            sell_vol: None,
        }),
    }
}

#[test]
fn test_scores_are_bounded() {
    for extreme in [-1.0, -0.5, -0.1, 0.0, 0.1, 0.5, 1.0] {
        let evaluation = evaluate(&full_bundle(extreme)).unwrap();
        assert_eq!(evaluation.indicators.len(), 9);
        for signal in &evaluation.indicators {
            assert!(
                (-1.0..=1.0).contains(&signal.continuous_score),
                "{} out of range: {}",
                signal.name,
                signal.continuous_score
            );
            assert_eq!(signal.strength, signal.continuous_score.abs());
        }
        let overall = evaluation.composite.overall_score;
        assert!((-1.0..=1.0).contains(&overall));
    }
}

#[test]
fn test_extreme_raw_values_stay_bounded() {
    assert_eq!(single_score(rsi(0.0)), 1.0);
    assert_eq!(single_score(rsi(100.0)), -1.0);
    assert_eq!(single_score(long_short(50.0)), -1.0);
    assert_eq!(single_score(bbands(7.0)), -0.5);
}

#[test]
fn test_anchor_points() {
    assert_eq!(single_score(rsi(50.0)), 0.0);
    assert_eq!(single_score(rsi(30.0)), 0.4);
    assert_eq!(single_score(rsi(70.0)), -0.4);
    assert_eq!(single_score(bbands(0.5)), 0.0);
    assert_eq!(single_score(bbands(0.0)), 0.5);
    assert_eq!(single_score(bbands(1.0)), -0.5);
}

#[test]
fn test_classification_matches_score() {
    for extreme in [-1.0, -0.3, 0.0, 0.3, 1.0] {
        let evaluation = evaluate(&full_bundle(extreme)).unwrap();
        for signal in &evaluation.indicators {
            assert_eq!(signal.signal, Signal::classify(signal.continuous_score));
        }
        let composite = evaluation.composite;
        assert_eq!(
            composite.overall_signal,
            Signal::classify(composite.overall_score)
        );
    }

    // Exactly on the threshold is neutral.
    let result = aggregate(&[(IndicatorKind::Ema, 1.0)]).unwrap();
    assert_eq!(result.overall_score, 0.2);
    assert_eq!(result.overall_signal, Signal::Neutral);
}

#[test]
fn test_group_weights_sum_to_one() {
    assert_eq!(ScoringMethod::current().total_weight(), 1.0);
}

#[test]
fn test_absent_indicator_is_not_neutral() {
    let without_kd = ReadingBundle::new().with(rsi(20.0));
    let with_neutral_kd = without_kd.clone().with(IndicatorReading::Kd(KdReading {
        k: 50.0,
        d: 50.0,
        k_prev: None,
        d_prev: None,
    }));

    let absent = evaluate(&without_kd).unwrap();
    let neutral = evaluate(&with_neutral_kd).unwrap();

    // Absence is the same as never supplying the reading.
    assert_eq!(
        absent.composite,
        aggregate(&[(IndicatorKind::Rsi, 0.6)]).unwrap()
    );
    // A neutral reading is averaged in and drags the group down.
    assert_eq!(neutral.indicators[1].continuous_score, 0.0);
    assert_eq!(absent.composite.overall_score, 0.15);
    assert_eq!(neutral.composite.overall_score, 0.075);
    assert_ne!(absent.composite.consensus, neutral.composite.consensus);
}

#[test]
fn test_identical_scores_full_consensus() {
    // RSI 30 and %B 0.1 both map to +0.4.
    let bundle = ReadingBundle::new().with(rsi(30.0)).with(bbands(0.1));
    let evaluation = evaluate(&bundle).unwrap();
    assert_eq!(evaluation.indicators[0].continuous_score, 0.4);
    assert_eq!(evaluation.indicators[1].continuous_score, 0.4);
    assert_eq!(evaluation.composite.consensus, 1.0);
}

#[test]
fn test_empty_bundle_is_an_error() {
    assert_eq!(evaluate(&ReadingBundle::new()), Err(ScoreError::EmptyInput));
    assert_eq!(aggregate(&[]), Err(ScoreError::EmptyInput));
}

#[test]
fn test_momentum_only_bundle_is_not_renormalized() {
    let evaluation = evaluate(&ReadingBundle::new().with(rsi(20.0))).unwrap();

    // 0.02 per RSI point beyond the 30 anchor.
    assert_eq!(evaluation.indicators.len(), 1);
    assert_eq!(evaluation.indicators[0].continuous_score, 0.6);
    assert_eq!(evaluation.indicators[0].signal, Signal::Bullish);

    let momentum = evaluation
        .groups
        .iter()
        .find(|g| g.group == Group::Momentum)
        .unwrap();
    assert_eq!(momentum.average, Some(0.6));
    assert_eq!(momentum.count, 1);

    assert_eq!(evaluation.composite.overall_score, 0.15);
    assert_eq!(evaluation.composite.overall_signal, Signal::Neutral);
    assert_eq!(evaluation.composite.consensus, 1.0);
}

#[test]
fn test_uniform_half_scores() {
    let scores: Vec<(IndicatorKind, f64)> =
        IndicatorKind::ALL.iter().map(|kind| (*kind, 0.5)).collect();
    let result = aggregate(&scores).unwrap();

    assert_eq!(result.consensus, 1.0);
    assert_eq!(result.overall_score, 0.5);
    assert_eq!(result.overall_signal, Signal::Bullish);
}

#[test]
fn test_uniform_half_readings_through_evaluate() {
    // atanh(0.5) = 0.549306..., inverted through each map's tanh scaling.
    let bundle = ReadingBundle {
        rsi: Some(RsiReading { value: 25.0 }),
        kd: Some(KdReading {
            k: 10.0,
            d: 10.0,
            k_prev: None,
            d_prev: None,
        }),
        macd: Some(MacdReading {
            macd: 0.274_653_072,
            signal: 0.0,
            close: 100.0,
            histogram_prev: None,
        }),
        ema: Some(EmaReading {
            fast: 100.366_204_096,
            slow: 100.0,
            fast_prev: None,
            slow_prev: None,
        }),
        bbands: Some(BbandsReading {
            percent_b: 0.0,
            upper: None,
            middle: None,
            lower: None,
        }),
        volume: Some(VolumeReading {
            volume: 136.620_409_6,
            volume_ma: 100.0,
            obv: 1_100.0,
            obv_prev: 1_000.0,
            close: 101.0,
            close_prev: 100.0,
        }),
        open_interest: None,
        long_short_ratio: Some(LongShortReading {
            ratio: 0.725_346_928,
            long_pct: None,
        }),
        taker: Some(TakerReading {
            ratio: 1.137_326_536,
            buy_vol: None,
            sell_vol: None,
        }),
    };

    let evaluation = evaluate(&bundle).unwrap();
    assert_eq!(evaluation.indicators.len(), 8);
    for signal in &evaluation.indicators {
        assert_eq!(signal.continuous_score, 0.5, "{}", signal.name);
    }
    for group in &evaluation.groups {
        assert_eq!(group.average, Some(0.5), "{:?}", group.group);
    }
    assert_eq!(evaluation.composite.consensus, 1.0);
    assert_eq!(evaluation.composite.overall_score, 0.5);
    assert_eq!(evaluation.composite.overall_signal, Signal::Bullish);
}

#[test]
fn test_balanced_long_short_is_zero() {
    assert_eq!(single_score(long_short(1.0)), 0.0);
    let signal = score_indicator(
        &ReadingBundle::new().with(long_short(1.0)),
        IndicatorKind::LongShortRatio,
    )
    .unwrap();
    assert_eq!(signal.signal, Signal::Neutral);
    assert_eq!(signal.metadata["trend"], "balanced");
}

#[test]
fn test_invalid_reading_is_excluded_not_zeroed() {
    let bundle = ReadingBundle::new().with(rsi(20.0)).with(long_short(-1.0));
    let evaluation = evaluate(&bundle).unwrap();
    assert_eq!(evaluation.indicators.len(), 1);
    assert_eq!(evaluation.composite.overall_score, 0.15);

    assert!(matches!(
        score_indicator(&bundle, IndicatorKind::LongShortRatio),
        Err(ScoreError::InvalidReading { .. })
    ));
}

#[test]
fn test_output_order_is_fixed() {
    let evaluation = evaluate(&full_bundle(0.3)).unwrap();
    let names: Vec<IndicatorKind> = evaluation.indicators.iter().map(|s| s.name).collect();
    assert_eq!(names, IndicatorKind::ALL.to_vec());
}
