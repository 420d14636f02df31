//! Read-only selection helpers over a finished `Analysis`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::domain::{InstrumentId, Pivot, SignalKind};

/// Where a price sits relative to the latest stroke pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotPosition {
    pub instrument: InstrumentId,
    pub pivot_index: usize,
    pub zg: f64,
    pub zd: f64,
    pub price: f64,
    /// `(price - zd) / (zg - zd) * 100`.
    pub position_pct: f64,
    pub zone: Zone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Below,
    Inside,
    Above,
}

impl Zone {
    pub fn of(pivot: &Pivot, price: f64) -> Self {
        if pivot.contains(price) {
            Zone::Inside
        } else if price < pivot.zd {
            Zone::Below
        } else {
            Zone::Above
        }
    }
}

/// Position of `price` against the most recent pivot, if any pivot exists.
pub fn pivot_position(analysis: &Analysis, price: f64) -> Option<PivotPosition> {
    let pivot = analysis.latest_pivot()?;
    Some(PivotPosition {
        instrument: analysis.instrument.clone(),
        pivot_index: pivot.index,
        zg: pivot.zg,
        zd: pivot.zd,
        price,
        position_pct: pivot.band_position_pct(price),
        zone: Zone::of(pivot, price),
    })
}

/// Instruments among `analyses` that carry a `kind` signal dated `date`.
pub fn instruments_with_signal<'a, I>(
    analyses: I,
    kind: SignalKind,
    date: NaiveDate,
) -> Vec<InstrumentId>
where
    I: IntoIterator<Item = &'a Analysis>,
{
    let mut hits: Vec<InstrumentId> = analyses
        .into_iter()
        .filter(|a| a.has_signal(kind, date))
        .map(|a| a.instrument.clone())
        .collect();
    hits.sort();
    hits
}

/// Most recent date carrying any signal, if the analysis has signals.
pub fn latest_signal_date(analysis: &Analysis) -> Option<NaiveDate> {
    analysis.signals.iter().map(|s| s.date).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use crate::structure::test_support::day;

    fn analysis_with_pivot(name: &str) -> Analysis {
        let mut a = Analysis::empty(name.into());
        a.pivots.push(Pivot {
            index: 0,
            level: 1,
            start_date: day(0),
            end_date: day(6),
            zg: 7.0,
            zd: 6.0,
            gg: 11.0,
            dd: 4.0,
            first_member: 0,
            last_member: 2,
        });
        a
    }

    #[test]
    fn position_inside_band() {
        let a = analysis_with_pivot("X");
        let pos = pivot_position(&a, 6.5).unwrap();
        assert!((pos.position_pct - 50.0).abs() < 1e-9);
        assert_eq!(pos.zone, Zone::Inside);
    }

    #[test]
    fn position_outside_band() {
        let a = analysis_with_pivot("X");
        let below = pivot_position(&a, 5.0).unwrap();
        assert!(below.position_pct < 0.0);
        assert_eq!(below.zone, Zone::Below);
        let above = pivot_position(&a, 8.0).unwrap();
        assert!(above.position_pct > 100.0);
        assert_eq!(above.zone, Zone::Above);
    }

    #[test]
    fn band_edges_count_as_inside() {
        let a = analysis_with_pivot("X");
        assert_eq!(pivot_position(&a, 6.0).unwrap().zone, Zone::Inside);
        assert_eq!(pivot_position(&a, 7.0).unwrap().zone, Zone::Inside);
    }

    #[test]
    fn no_pivot_no_position() {
        assert!(pivot_position(&Analysis::empty("X".into()), 1.0).is_none());
    }

    #[test]
    fn selects_instruments_by_signal() {
        let mut a = Analysis::empty("BBB".into());
        a.signals.push(Signal {
            date: day(5),
            kind: SignalKind::ThirdBuy,
            price: 8.0,
            stroke_index: 4,
            reference_pivot: Some(0),
        });
        let mut b = Analysis::empty("AAA".into());
        b.signals = a.signals.clone();
        let c = Analysis::empty("CCC".into());

        let hits = instruments_with_signal([&a, &b, &c], SignalKind::ThirdBuy, day(5));
        assert_eq!(hits, vec![InstrumentId::new("AAA"), InstrumentId::new("BBB")]);
        assert!(instruments_with_signal([&a], SignalKind::FirstBuy, day(5)).is_empty());
        assert_eq!(latest_signal_date(&a), Some(day(5)));
    }
}
