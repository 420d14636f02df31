//! Segment builder — groups strokes into larger directional moves.
//!
//! The running segment takes the direction of its first stroke. Triples
//! `(x, y, z)` whose first stroke runs against the segment are checked for a
//! breach: for an up segment, `z` going below `x`'s low; for a down segment,
//! `z` going above `x`'s high. A breach closes the segment at `y`, its last
//! stroke in the segment's direction, and `z` opens the next one. Strokes are
//! contiguous, so `x` and `z` are the only pair in a triple whose extremes can
//! differ. Whatever remains after the scan is flushed as an in-progress
//! segment.

use crate::domain::{Direction, Segment, Stroke};

/// Minimum strokes in a completed segment.
pub const MIN_SEGMENT_STROKES: usize = 3;

pub fn build_segments(strokes: &[Stroke]) -> Vec<Segment> {
    let n = strokes.len();
    let mut segments = Vec::new();
    if n < MIN_SEGMENT_STROKES {
        return segments;
    }

    let mut start = 0;
    let mut i = 1;
    while i + 2 < n {
        let direction = strokes[start].direction;
        let (x, z) = (&strokes[i], &strokes[i + 2]);
        let breached = x.direction == direction.opposite()
            && match direction {
                Direction::Up => z.low < x.low,
                Direction::Down => z.high > x.high,
            };
        // x sits at start + 1 or later, so the closed span is never short.
        if breached && i + 2 - start >= MIN_SEGMENT_STROKES {
            segments.push(span(strokes, start, i + 1, segments.len(), true));
            start = i + 2;
            i = start + 1;
        } else {
            i += 1;
        }
    }

    segments.push(span(strokes, start, n - 1, segments.len(), false));
    segments
}

fn span(strokes: &[Stroke], first: usize, last: usize, index: usize, completed: bool) -> Segment {
    let members = &strokes[first..=last];
    let high = members.iter().map(|s| s.high).fold(f64::NEG_INFINITY, f64::max);
    let low = members.iter().map(|s| s.low).fold(f64::INFINITY, f64::min);
    Segment {
        index,
        start_date: members[0].start_date,
        end_date: members[members.len() - 1].end_date,
        direction: members[0].direction,
        high,
        low,
        first_stroke: first,
        last_stroke: last,
        completed,
    }
}
