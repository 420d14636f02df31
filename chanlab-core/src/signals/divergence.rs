//! Divergence (beichi): price makes a new extreme, momentum does not.

use crate::domain::{Direction, Signal, SignalKind, Stroke};
use crate::momentum::MomentumSeries;

use super::lookup::StrokeIndex;

/// Bottom divergence on down strokes, top divergence on up strokes.
///
/// Each stroke is compared with up to `lookback` earlier strokes of the same
/// direction. Strokes whose end date has no momentum value are skipped, and
/// earlier strokes without a value do not contribute to the momentum bound.
pub fn detect_divergences(
    strokes: &[Stroke],
    index: &StrokeIndex,
    momentum: &MomentumSeries,
    lookback: usize,
) -> Vec<Signal> {
    let mut signals = Vec::new();

    for (i, stroke) in strokes.iter().enumerate() {
        let prior = index.preceding(i, lookback);
        if prior.is_empty() {
            continue;
        }
        let Some(current) = momentum.value_at(stroke.end_date) else {
            continue;
        };
        let prior_momentum = prior
            .iter()
            .filter_map(|&p| momentum.value_at(strokes[p].end_date));

        let fired = match stroke.direction {
            Direction::Down => {
                let lowest = prior
                    .iter()
                    .map(|&p| strokes[p].low)
                    .fold(f64::INFINITY, f64::min);
                let weakest = prior_momentum.fold(f64::INFINITY, f64::min);
                (stroke.low < lowest && weakest.is_finite() && current > weakest)
                    .then_some((SignalKind::BottomDivergence, stroke.low))
            }
            Direction::Up => {
                let highest = prior
                    .iter()
                    .map(|&p| strokes[p].high)
                    .fold(f64::NEG_INFINITY, f64::max);
                let strongest = prior_momentum.fold(f64::NEG_INFINITY, f64::max);
                (stroke.high > highest && strongest.is_finite() && current < strongest)
                    .then_some((SignalKind::TopDivergence, stroke.high))
            }
        };

        if let Some((kind, price)) = fired {
            signals.push(Signal {
                date: stroke.end_date,
                kind,
                price,
                stroke_index: stroke.index,
                reference_pivot: None,
            });
        }
    }

    signals
}
