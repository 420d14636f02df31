//! Indexed look-backs over materialized strokes and pivots.

use chrono::NaiveDate;

use crate::domain::{Direction, Pivot, Stroke};

/// Stroke positions grouped by direction.
///
/// `preceding(i, n)` answers "the previous `n` strokes with the same
/// direction as stroke `i`" as a slice, without rescanning.
#[derive(Debug, Clone)]
pub struct StrokeIndex {
    up: Vec<usize>,
    down: Vec<usize>,
    /// Direction and position inside its direction list, per stroke.
    rank: Vec<(Direction, usize)>,
}

impl StrokeIndex {
    pub fn new(strokes: &[Stroke]) -> Self {
        let mut up = Vec::new();
        let mut down = Vec::new();
        let mut rank = Vec::with_capacity(strokes.len());
        for (i, s) in strokes.iter().enumerate() {
            let list = match s.direction {
                Direction::Up => &mut up,
                Direction::Down => &mut down,
            };
            rank.push((s.direction, list.len()));
            list.push(i);
        }
        Self { up, down, rank }
    }

    /// Positions of up to `n` earlier strokes sharing stroke `i`'s direction,
    /// oldest first.
    pub fn preceding(&self, i: usize, n: usize) -> &[usize] {
        let (direction, r) = self.rank[i];
        &self.positions(direction)[r.saturating_sub(n)..r]
    }

    pub fn positions(&self, direction: Direction) -> &[usize] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

/// Pivots ordered by end date, queried by binary search.
///
/// Requires the pivots to be sorted by `end_date`, as `build_pivots` emits them.
#[derive(Debug, Clone, Copy)]
pub struct PivotTimeline<'a> {
    pivots: &'a [Pivot],
}

impl<'a> PivotTimeline<'a> {
    pub fn new(pivots: &'a [Pivot]) -> Self {
        debug_assert!(pivots.windows(2).all(|w| w[0].end_date <= w[1].end_date));
        Self { pivots }
    }

    /// Latest pivot with `end_date < date`.
    pub fn ended_before(&self, date: NaiveDate) -> Option<&'a Pivot> {
        let n = self.pivots.partition_point(|p| p.end_date < date);
        n.checked_sub(1).map(|i| &self.pivots[i])
    }

    /// Latest pivot with `end_date <= date`.
    pub fn ended_by(&self, date: NaiveDate) -> Option<&'a Pivot> {
        let n = self.pivots.partition_point(|p| p.end_date <= date);
        n.checked_sub(1).map(|i| &self.pivots[i])
    }
}
