//! Derived structural entities: merged bars, fractals, strokes, segments, pivots.
//!
//! Every entity here is produced by one pipeline stage and consumed read-only
//! by later stages. Cross references between stages are plain indices into the
//! earlier stage's output vector.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a stroke or segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A bar, or a run of bars collapsed under containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedBar {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub high: f64,
    pub low: f64,
    /// Date of the source bar that contributed `high`.
    pub high_date: NaiveDate,
    /// Date of the source bar that contributed `low`.
    pub low_date: NaiveDate,
    /// Number of source bars folded into this one.
    pub bar_count: usize,
}

impl MergedBar {
    /// True if either bar's `[low, high]` range encloses the other's.
    pub fn contains_or_within(&self, high: f64, low: f64) -> bool {
        (self.high >= high && self.low <= low) || (high >= self.high && low <= self.low)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    Top,
    Bottom,
}

/// A 3-bar local extremum over merged bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    pub date: NaiveDate,
    pub kind: FractalKind,
    pub high: f64,
    pub low: f64,
    /// Index of the pivot bar in the merged-bar sequence.
    pub bar_index: usize,
}

impl Fractal {
    /// The price that defines this fractal: high for tops, low for bottoms.
    pub fn extreme(&self) -> f64 {
        match self.kind {
            FractalKind::Top => self.high,
            FractalKind::Bottom => self.low,
        }
    }
}

/// Minimal directional move connecting two alternating fractals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub direction: Direction,
    pub high: f64,
    pub low: f64,
    /// Index of the opening fractal in the fractal sequence.
    pub start_fractal: usize,
    /// Index of the closing fractal in the fractal sequence.
    pub end_fractal: usize,
}

/// A run of strokes forming a larger directional move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub direction: Direction,
    pub high: f64,
    pub low: f64,
    pub first_stroke: usize,
    pub last_stroke: usize,
    /// False for the trailing segment that no break has closed yet.
    pub completed: bool,
}

impl Segment {
    pub fn stroke_count(&self) -> usize {
        self.last_stroke - self.first_stroke + 1
    }
}

/// Consolidation range formed by the overlap of three consecutive swings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub index: usize,
    /// 1 for stroke pivots, 2 for segment pivots.
    pub level: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Upper bound of the overlap band.
    pub zg: f64,
    /// Lower bound of the overlap band.
    pub zd: f64,
    /// Highest high of the member swings.
    pub gg: f64,
    /// Lowest low of the member swings.
    pub dd: f64,
    pub first_member: usize,
    pub last_member: usize,
}

impl Pivot {
    /// Position of `price` relative to the `[zd, zg]` band, in percent.
    ///
    /// 0 is the lower bound, 100 the upper bound; values outside the band
    /// fall below 0 or above 100.
    pub fn band_position_pct(&self, price: f64) -> f64 {
        (price - self.zd) / (self.zg - self.zd) * 100.0
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.zd && price <= self.zg
    }
}

/// Anything with a date span and a price range that pivots can be built over.
pub trait Swing {
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
}

impl Swing for Stroke {
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
    fn high(&self) -> f64 {
        self.high
    }
    fn low(&self) -> f64 {
        self.low
    }
}

impl Swing for Segment {
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
    fn high(&self) -> f64 {
        self.high
    }
    fn low(&self) -> f64 {
        self.low
    }
}
