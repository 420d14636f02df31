//! Pivot builder — consolidation ranges from three overlapping swings.
//!
//! A window of three consecutive swings is valid when
//! `zg = min(high) > zd = max(low)`. A valid window emits a pivot and the scan
//! jumps two swings ahead, so the third member can seed the next window. An
//! invalid window advances by one.

use tracing::trace;

use crate::domain::{Pivot, Swing};

/// Pivot level for stroke pivots.
pub const STROKE_LEVEL: u8 = 1;
/// Pivot level for segment pivots.
pub const SEGMENT_LEVEL: u8 = 2;

pub fn build_pivots<S: Swing>(swings: &[S], level: u8) -> Vec<Pivot> {
    let mut pivots = Vec::new();
    if swings.len() < 3 {
        return pivots;
    }

    let mut i = 0;
    while i + 2 < swings.len() {
        let window = &swings[i..i + 3];
        match overlap(window) {
            Some((zg, zd)) => {
                let gg = window.iter().map(Swing::high).fold(f64::NEG_INFINITY, f64::max);
                let dd = window.iter().map(Swing::low).fold(f64::INFINITY, f64::min);
                pivots.push(Pivot {
                    index: pivots.len(),
                    level,
                    start_date: window[0].start_date(),
                    end_date: window[2].end_date(),
                    zg,
                    zd,
                    gg,
                    dd,
                    first_member: i,
                    last_member: i + 2,
                });
                i += 2;
            }
            None => {
                trace!(window = i, level, "no overlap");
                i += 1;
            }
        }
    }
    pivots
}

/// `(zg, zd)` of a window, or `None` when the ranges do not overlap.
fn overlap<S: Swing>(window: &[S]) -> Option<(f64, f64)> {
    let zg = window.iter().map(Swing::high).fold(f64::INFINITY, f64::min);
    let zd = window.iter().map(Swing::low).fold(f64::NEG_INFINITY, f64::max);
    (zg > zd).then_some((zg, zd))
}
