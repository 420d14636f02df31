//! Fractal detector — 3-bar pivots over merged bars.
//!
//! Top at `i`: `high[i]` strictly above both neighbours' highs.
//! Bottom at `i`: `low[i]` strictly below both neighbours' lows.
//! The first and last merged bars never form a fractal.

use crate::domain::{Fractal, FractalKind, MergedBar};

/// Detect all top and bottom fractals, ordered by bar index.
pub fn detect_fractals(merged: &[MergedBar]) -> Vec<Fractal> {
    if merged.len() < 3 {
        return Vec::new();
    }

    let mut fractals = Vec::new();
    for (offset, window) in merged.windows(3).enumerate() {
        let (left, mid, right) = (&window[0], &window[1], &window[2]);
        let bar_index = offset + 1;

        if mid.high > left.high && mid.high > right.high {
            fractals.push(Fractal {
                date: mid.high_date,
                kind: FractalKind::Top,
                high: mid.high,
                low: mid.low,
                bar_index,
            });
        }
        // A bar cannot be both on merged input; that would imply containment.
        if mid.low < left.low && mid.low < right.low {
            fractals.push(Fractal {
                date: mid.low_date,
                kind: FractalKind::Bottom,
                high: mid.high,
                low: mid.low,
                bar_index,
            });
        }
    }
    fractals
}
