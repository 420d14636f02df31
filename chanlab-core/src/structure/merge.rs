//! Bar merger — K-line containment resolution.
//!
//! Two bars are in containment when one `[low, high]` range encloses the
//! other. Contained bars are folded into the previous merged bar following
//! the running direction: upward runs keep the higher high and higher low,
//! downward runs keep the lower high and lower low. The output has no two
//! adjacent entries in containment.

use crate::domain::{Bar, MergedBar};

/// Running direction of the merge, before a first non-contained step is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeDirection {
    Unknown,
    Up,
    Down,
}

/// Collapse contained bars. Empty input yields empty output.
pub fn merge_bars(bars: &[Bar]) -> Vec<MergedBar> {
    let Some(first) = bars.first() else {
        return Vec::new();
    };

    let mut merged = Vec::with_capacity(bars.len());
    let mut current = fresh(first);
    let mut direction = MergeDirection::Unknown;

    for bar in &bars[1..] {
        if current.contains_or_within(bar.high, bar.low) {
            if direction == MergeDirection::Unknown {
                direction = if bar.high > current.high {
                    MergeDirection::Up
                } else {
                    MergeDirection::Down
                };
            }
            fold(&mut current, bar, direction);
        } else {
            direction = if bar.high > current.high {
                MergeDirection::Up
            } else {
                MergeDirection::Down
            };
            merged.push(std::mem::replace(&mut current, fresh(bar)));
        }
    }
    merged.push(current);

    merged
}

fn fresh(bar: &Bar) -> MergedBar {
    MergedBar {
        start_date: bar.date,
        end_date: bar.date,
        high: bar.high,
        low: bar.low,
        high_date: bar.date,
        low_date: bar.date,
        bar_count: 1,
    }
}

fn fold(last: &mut MergedBar, bar: &Bar, direction: MergeDirection) {
    match direction {
        MergeDirection::Up => {
            if bar.high > last.high {
                last.high = bar.high;
                last.high_date = bar.date;
            }
            if bar.low > last.low {
                last.low = bar.low;
                last.low_date = bar.date;
            }
        }
        // Unknown never reaches here; it is resolved before folding.
        MergeDirection::Down | MergeDirection::Unknown => {
            if bar.high < last.high {
                last.high = bar.high;
                last.high_date = bar.date;
            }
            if bar.low < last.low {
                last.low = bar.low;
                last.low_date = bar.date;
            }
        }
    }
    last.end_date = bar.date;
    last.bar_count += 1;
}
