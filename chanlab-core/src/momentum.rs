//! Momentum input for the signal classifier.
//!
//! The classifier only needs one number per date (typically the MACD
//! histogram). The series is injected: callers either supply their own values
//! or derive them from the bars through a `MomentumSource`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Bar;

/// Momentum values keyed by date. NaN values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumSeries {
    values: BTreeMap<NaiveDate, f64>,
}

impl MomentumSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(date, value)` pairs, skipping NaN.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let values = pairs.into_iter().filter(|(_, v)| !v.is_nan()).collect();
        Self { values }
    }

    /// Zip a value series with the bars it was computed from.
    ///
    /// `values` must be index-aligned with `bars`; extra entries on either
    /// side are ignored.
    pub fn aligned(bars: &[Bar], values: &[f64]) -> Self {
        Self::from_pairs(bars.iter().zip(values).map(|(b, &v)| (b.date, v)))
    }

    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A provider of momentum values for a bar history.
pub trait MomentumSource: Send + Sync {
    /// Human-readable name (e.g., "macd_hist_12_26_9").
    fn name(&self) -> &str;

    fn series(&self, bars: &[Bar]) -> MomentumSeries;
}
