//! Stroke builder — connects alternating fractals into directional strokes.
//!
//! The builder is a two-state machine driven by a pure reducer:
//!
//! - `AwaitingOpposite`: nothing seen yet; the first fractal becomes the candidate.
//! - `TrackingCandidate`: a candidate endpoint exists. An opposite fractal that
//!   extends past the candidate closes a stroke and becomes the new candidate.
//!   A same-kind fractal replaces the candidate only when it is more extreme.
//!
//! Emitted strokes are final. A later, more extreme same-kind fractal moves the
//! candidate but does not rewrite the stroke that ended at the old one.

use tracing::trace;

use crate::config::StrokeConfig;
use crate::domain::{Direction, Fractal, FractalKind, Stroke};

/// Reducer state. `candidate` is an index into the fractal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    AwaitingOpposite,
    TrackingCandidate { candidate: usize },
}

/// Why a fractal was not promoted. Handled locally, never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Opposite fractal does not extend past the candidate's own extreme.
    ExtremumNotExceeded,
    /// Same-kind fractal is not more extreme than the candidate.
    NotMoreExtreme,
    /// Opposite fractal is too close to the candidate in merged bars.
    GapTooSmall { gap: usize, required: usize },
}

/// Outcome of feeding one fractal to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Fractal became the candidate without closing a stroke.
    Seeded,
    /// Candidate replaced by a more extreme fractal of the same kind.
    Replaced,
    /// Stroke closed from the previous candidate to this fractal.
    Closed(Stroke),
    Rejected(Rejection),
}

/// Pure reducer: `(state, fractal) -> (state', outcome)`.
///
/// `fractals[at]` is the fractal being fed; earlier fractals are only read
/// through the candidate index. `next_index` is the sequence number a closed
/// stroke will carry.
pub fn step(
    state: StrokeState,
    fractals: &[Fractal],
    at: usize,
    next_index: usize,
    config: &StrokeConfig,
) -> (StrokeState, StepOutcome) {
    let fractal = &fractals[at];
    let candidate = match state {
        StrokeState::AwaitingOpposite => {
            return (
                StrokeState::TrackingCandidate { candidate: at },
                StepOutcome::Seeded,
            );
        }
        StrokeState::TrackingCandidate { candidate } => candidate,
    };
    let cand = &fractals[candidate];

    if fractal.kind == cand.kind {
        let more_extreme = match fractal.kind {
            FractalKind::Top => fractal.extreme() > cand.extreme(),
            FractalKind::Bottom => fractal.extreme() < cand.extreme(),
        };
        return if more_extreme {
            (
                StrokeState::TrackingCandidate { candidate: at },
                StepOutcome::Replaced,
            )
        } else {
            (state, StepOutcome::Rejected(Rejection::NotMoreExtreme))
        };
    }

    let extends = match fractal.kind {
        FractalKind::Top => fractal.high > cand.high,
        FractalKind::Bottom => fractal.low < cand.low,
    };
    if !extends {
        return (state, StepOutcome::Rejected(Rejection::ExtremumNotExceeded));
    }

    if let Some(required) = config.min_bar_gap {
        let gap = fractal.bar_index.saturating_sub(cand.bar_index);
        if gap < required {
            return (
                state,
                StepOutcome::Rejected(Rejection::GapTooSmall { gap, required }),
            );
        }
    }

    let (direction, high, low) = match fractal.kind {
        FractalKind::Top => (Direction::Up, fractal.high, cand.low),
        FractalKind::Bottom => (Direction::Down, cand.high, fractal.low),
    };
    let stroke = Stroke {
        index: next_index,
        start_date: cand.date,
        end_date: fractal.date,
        direction,
        high,
        low,
        start_fractal: candidate,
        end_fractal: at,
    };
    (
        StrokeState::TrackingCandidate { candidate: at },
        StepOutcome::Closed(stroke),
    )
}

/// Fold the reducer over all fractals. Fewer than two fractals yields nothing.
pub fn build_strokes(fractals: &[Fractal], config: &StrokeConfig) -> Vec<Stroke> {
    let mut strokes = Vec::new();
    if fractals.len() < 2 {
        return strokes;
    }

    let mut state = StrokeState::AwaitingOpposite;
    for at in 0..fractals.len() {
        let (next, outcome) = step(state, fractals, at, strokes.len(), config);
        state = next;
        match outcome {
            StepOutcome::Closed(stroke) => strokes.push(stroke),
            StepOutcome::Rejected(reason) => {
                trace!(fractal = at, date = %fractals[at].date, ?reason, "fractal rejected");
            }
            StepOutcome::Seeded | StepOutcome::Replaced => {}
        }
    }
    strokes
}
