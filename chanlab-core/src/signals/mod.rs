//! Signal classifier.
//!
//! Rules are independent and may co-fire on the same stroke. All look-backs
//! go through `StrokeIndex` and `PivotTimeline` over the materialized arrays.

pub mod divergence;
pub mod lookup;
pub mod points;

pub use divergence::detect_divergences;
pub use lookup::{PivotTimeline, StrokeIndex};
pub use points::{detect_points, Side};

use crate::config::SignalConfig;
use crate::domain::{Pivot, Signal, Stroke};
use crate::momentum::MomentumSeries;

/// Run every rule and return signals ordered by `(date, kind)`.
///
/// `pivots` must be ordered by end date (stroke-level pivots from
/// `build_pivots` are).
pub fn classify(
    strokes: &[Stroke],
    pivots: &[Pivot],
    momentum: &MomentumSeries,
    config: &SignalConfig,
) -> Vec<Signal> {
    let index = StrokeIndex::new(strokes);
    let timeline = PivotTimeline::new(pivots);

    let mut signals = detect_divergences(strokes, &index, momentum, config.divergence_lookback);
    signals.extend(detect_points(strokes, &timeline, Side::Buy));
    if config.sell_signals {
        signals.extend(detect_points(strokes, &timeline, Side::Sell));
    }
    signals.sort_by(|a, b| a.date.cmp(&b.date).then(a.kind.cmp(&b.kind)));
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction::{Down, Up};
    use crate::domain::SignalKind;
    use crate::structure::pivot::{build_pivots, STROKE_LEVEL};
    use crate::structure::test_support::strokes_from;

    #[test]
    fn first_buy_and_bottom_divergence_co_fire() {
        let strokes = strokes_from(&[
            (Down, 10.0, 6.0),
            (Up, 7.0, 4.0),
            (Down, 11.0, 5.0),
            (Up, 9.0, 5.0),
            (Down, 9.0, 3.0),
        ]);
        let pivots = build_pivots(&strokes, STROKE_LEVEL);
        let momentum = MomentumSeries::from_pairs([
            (strokes[0].end_date, -3.0),
            (strokes[2].end_date, -4.0),
            (strokes[4].end_date, -1.0),
        ]);
        let signals = classify(&strokes, &pivots, &momentum, &SignalConfig::default());
        let kinds: Vec<SignalKind> = signals.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SignalKind::BottomDivergence, SignalKind::FirstBuy]);
        assert!(signals.iter().all(|s| s.date == strokes[4].end_date));
    }

    #[test]
    fn sell_signals_can_be_disabled() {
        let strokes = strokes_from(&[
            (Up, 10.0, 5.0),
            (Down, 9.0, 6.0),
            (Up, 11.0, 4.0),
            (Down, 11.0, 7.0),
            (Up, 12.0, 7.0),
        ]);
        let pivots = build_pivots(&strokes, STROKE_LEVEL);
        let config = SignalConfig {
            sell_signals: false,
            ..Default::default()
        };
        let signals = classify(&strokes, &pivots, &MomentumSeries::new(), &config);
        assert!(signals.iter().all(|s| s.kind.is_bullish()));
        let with_sells =
            classify(&strokes, &pivots, &MomentumSeries::new(), &SignalConfig::default());
        assert!(with_sells.iter().any(|s| s.kind == SignalKind::FirstSell));
    }

    #[test]
    fn empty_inputs_yield_no_signals() {
        assert!(classify(&[], &[], &MomentumSeries::new(), &SignalConfig::default()).is_empty());
    }
}
