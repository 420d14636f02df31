//! First/second/third buy points and their sell-side mirrors.
//!
//! Buy points are evaluated on down strokes (pullbacks), sell points on up
//! strokes (rallies):
//!
//! | Point  | Buy (down stroke)                               | Sell (up stroke)                                |
//! |--------|-------------------------------------------------|-------------------------------------------------|
//! | First  | low breaks below `dd` of the latest prior pivot | high breaks above `gg` of the latest prior pivot |
//! | Second | ≥2 strokes after a first buy, low above `s[k-2]` | ≥2 strokes after a first sell, high below `s[k-2]` |
//! | Third  | low stays above `zg` of a pivot already left    | high stays below `zd` of a pivot already left   |

use crate::domain::{Direction, Pivot, Signal, SignalKind, Stroke};

use super::lookup::PivotTimeline;

/// Which side of the book the points are evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    fn stroke_direction(self) -> Direction {
        match self {
            Side::Buy => Direction::Down,
            Side::Sell => Direction::Up,
        }
    }

    fn kinds(self) -> [SignalKind; 3] {
        match self {
            Side::Buy => [SignalKind::FirstBuy, SignalKind::SecondBuy, SignalKind::ThirdBuy],
            Side::Sell => [
                SignalKind::FirstSell,
                SignalKind::SecondSell,
                SignalKind::ThirdSell,
            ],
        }
    }

    /// The stroke price the rules look at: low for buys, high for sells.
    fn price(self, stroke: &Stroke) -> f64 {
        match self {
            Side::Buy => stroke.low,
            Side::Sell => stroke.high,
        }
    }

    /// Price escaped the whole pivot range (below `dd` / above `gg`).
    fn breaks_out(self, price: f64, pivot: &Pivot) -> bool {
        match self {
            Side::Buy => price < pivot.dd,
            Side::Sell => price > pivot.gg,
        }
    }

    /// Price failed to make a new extreme versus `earlier`.
    fn holds(self, price: f64, earlier: f64) -> bool {
        match self {
            Side::Buy => price > earlier,
            Side::Sell => price < earlier,
        }
    }

    /// Pullback stayed outside the pivot band (above `zg` / below `zd`).
    fn stays_outside(self, price: f64, pivot: &Pivot) -> bool {
        match self {
            Side::Buy => price > pivot.zg,
            Side::Sell => price < pivot.zd,
        }
    }
}

pub fn detect_points(strokes: &[Stroke], timeline: &PivotTimeline<'_>, side: Side) -> Vec<Signal> {
    let [first_kind, second_kind, third_kind] = side.kinds();
    let mut signals = Vec::new();
    // (stroke position, pivot index) of the most recent first point.
    let mut last_first: Option<(usize, usize)> = None;

    for (k, stroke) in strokes.iter().enumerate() {
        if stroke.direction != side.stroke_direction() {
            continue;
        }
        let price = side.price(stroke);
        let mut emit = |kind: SignalKind, pivot: Option<usize>| {
            signals.push(Signal {
                date: stroke.end_date,
                kind,
                price,
                stroke_index: stroke.index,
                reference_pivot: pivot,
            });
        };

        if let Some((j, pivot)) = last_first {
            if k >= j + 2 && side.holds(price, side.price(&strokes[k - 2])) {
                emit(second_kind, Some(pivot));
            }
        }

        if let Some(pivot) = timeline.ended_before(stroke.end_date) {
            if side.breaks_out(price, pivot) {
                emit(first_kind, Some(pivot.index));
                last_first = Some((k, pivot.index));
            }
        }

        if let Some(pivot) = timeline.ended_by(stroke.start_date) {
            if side.stays_outside(price, pivot) {
                emit(third_kind, Some(pivot.index));
            }
        }
    }

    signals
}
