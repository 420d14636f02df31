//! End-to-end pipeline scenarios through the public API.

use chrono::{Duration, NaiveDate};

use chanlab_core::config::{AnalysisConfig, SignalConfig};
use chanlab_core::domain::{Bar, Direction, FractalKind, SignalKind, Stroke};
use chanlab_core::indicators::MacdHistogram;
use chanlab_core::momentum::MomentumSeries;
use chanlab_core::query::{pivot_position, Zone};
use chanlab_core::signals::classify;
use chanlab_core::structure::{build_pivots, detect_fractals, merge_bars, STROKE_LEVEL};
use chanlab_core::synthetic::random_walk;
use chanlab_core::{analyze, analyze_with_source, AnalysisError, Stage};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(offset)
}

fn bars(ranges: &[(f64, f64)]) -> Vec<Bar> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, &(h, l))| Bar::new(day(i as i64), l, h, l, h))
        .collect()
}

fn strokes(legs: &[(Direction, f64, f64)]) -> Vec<Stroke> {
    legs.iter()
        .enumerate()
        .map(|(i, &(direction, high, low))| Stroke {
            index: i,
            start_date: day(i as i64 * 3),
            end_date: day(i as i64 * 3 + 3),
            direction,
            high,
            low,
            start_fractal: i,
            end_fractal: i + 1,
        })
        .collect()
}

#[test]
fn scenario_fractals_only_at_interior_indices() {
    let merged = merge_bars(&bars(&[(10.0, 8.0), (12.0, 9.0), (11.0, 7.0), (13.0, 10.0), (9.0, 6.0)]));
    assert_eq!(merged.len(), 5, "no pair of these bars is in containment");

    let fractals = detect_fractals(&merged);
    let found: Vec<(usize, FractalKind)> = fractals.iter().map(|f| (f.bar_index, f.kind)).collect();
    assert_eq!(
        found,
        vec![
            (1, FractalKind::Top),
            (2, FractalKind::Bottom),
            (3, FractalKind::Top),
        ]
    );
    assert!(fractals.iter().all(|f| f.bar_index != 0 && f.bar_index != 4));
}

#[test]
fn scenario_pivot_from_three_overlapping_strokes() {
    let s = strokes(&[
        (Direction::Down, 10.0, 6.0),
        (Direction::Up, 7.0, 4.0),
        (Direction::Down, 11.0, 5.0),
    ]);
    let pivots = build_pivots(&s, STROKE_LEVEL);
    assert_eq!(pivots.len(), 1);
    assert_eq!(pivots[0].zg, 7.0);
    assert_eq!(pivots[0].zd, 6.0);
    assert!(pivots[0].zg > pivots[0].zd);
}

#[test]
fn scenario_first_buy_below_pivot_dd() {
    // Pivot over strokes 0..=2: zg = 8, zd = 7, dd = 6.
    let s = strokes(&[
        (Direction::Down, 10.0, 6.0),
        (Direction::Up, 8.0, 7.0),
        (Direction::Down, 11.0, 6.5),
        (Direction::Up, 9.0, 6.5),
        (Direction::Down, 9.0, 5.0),
    ]);
    let pivots = build_pivots(&s, STROKE_LEVEL);
    assert_eq!(pivots[0].dd, 6.0);

    let signals = classify(&s, &pivots, &MomentumSeries::new(), &SignalConfig::default());
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].kind, SignalKind::FirstBuy);
    assert_eq!(signals[0].date, s[4].end_date);
    assert_eq!(signals[0].price, 5.0);
    assert_eq!(signals[0].reference_pivot, Some(0));
}

#[test]
fn scenario_empty_input_is_not_an_error() {
    let analysis = analyze("NONE".into(), &[], &MomentumSeries::new(), &AnalysisConfig::default())
        .unwrap();
    assert!(analysis.merged_bars.is_empty());
    assert!(analysis.fractals.is_empty());
    assert!(analysis.strokes.is_empty());
    assert!(analysis.segments.is_empty());
    assert!(analysis.pivots.is_empty());
    assert!(analysis.signals.is_empty());
    assert_eq!(analysis.insufficient, Some(Stage::Merge));
}

#[test]
fn malformed_history_is_rejected_before_any_stage() {
    let mut input = bars(&[(10.0, 8.0), (12.0, 9.0), (11.0, 7.0)]);
    input.swap(0, 1);
    let err = analyze("BAD".into(), &input, &MomentumSeries::new(), &AnalysisConfig::default())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedInput { index: 1, .. }));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.signal.divergence_lookback = 0;
    let err = analyze("X".into(), &[], &MomentumSeries::new(), &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidConfig(_)));
}

#[test]
fn five_years_of_random_walk_with_macd() {
    let input = random_walk("WALK", day(0), day(5 * 365));
    let analysis = analyze_with_source(
        "WALK".into(),
        &input,
        &MacdHistogram::default(),
        &AnalysisConfig::default(),
    )
    .unwrap();

    assert!(analysis.insufficient.is_none());
    assert!(analysis.merged_bars.len() < input.len());
    assert!(analysis.strokes.len() > 10);
    assert!(!analysis.pivots.is_empty());
    assert!(analysis.segments.iter().any(|s| s.completed));

    let last_close = input.last().map(|b| b.close).unwrap();
    let position = pivot_position(&analysis, last_close).unwrap();
    let expected = match position.position_pct {
        p if p < 0.0 => Zone::Below,
        p if p > 100.0 => Zone::Above,
        _ => Zone::Inside,
    };
    assert_eq!(position.zone, expected);
}

#[test]
fn segment_pivots_can_be_disabled() {
    let input = random_walk("WALK", day(0), day(3 * 365));
    let mut config = AnalysisConfig::default();
    config.pivot.segment_level = false;
    let analysis =
        analyze_with_source("WALK".into(), &input, &MacdHistogram::default(), &config).unwrap();
    assert!(analysis.segment_pivots.is_empty());
}

#[test]
fn long_walk_closes_segments_and_builds_segment_pivots() {
    let input = random_walk("LONG", day(0), day(10 * 365));
    let analysis = analyze_with_source(
        "LONG".into(),
        &input,
        &MacdHistogram::default(),
        &AnalysisConfig::default(),
    )
    .unwrap();

    let completed = analysis.segments.iter().filter(|s| s.completed).count();
    assert!(completed >= 3, "only {completed} completed segments");
    assert_eq!(completed, analysis.segments.len() - 1);
    for pair in analysis.segments.windows(2) {
        assert_ne!(pair[0].direction, pair[1].direction);
    }

    assert!(!analysis.segment_pivots.is_empty());
    for p in &analysis.segment_pivots {
        assert_eq!(p.level, 2);
        assert!(p.zg > p.zd);
        assert!(p.dd <= p.zd && p.zg <= p.gg);
    }
}
