//! Selection queries over the repository.

use chrono::NaiveDate;

use chanlab_core::domain::{InstrumentId, SignalKind};
use chanlab_core::query::{instruments_with_signal, pivot_position, PivotPosition};

use crate::recompute::RunError;
use crate::repository::StructureRepository;

/// Instruments whose stored analysis has a `kind` signal on `date`.
pub fn scan_signals(
    repository: &dyn StructureRepository,
    kind: SignalKind,
    date: NaiveDate,
) -> Result<Vec<InstrumentId>, RunError> {
    let analyses = repository.load_all()?;
    Ok(instruments_with_signal(&analyses, kind, date))
}

/// Position of `price` against the instrument's latest pivot.
///
/// `Ok(None)` when the instrument is stored but has no pivot yet.
pub fn position_report(
    repository: &dyn StructureRepository,
    instrument: &InstrumentId,
    price: f64,
) -> Result<Option<PivotPosition>, RunError> {
    let analysis = repository
        .load(instrument)?
        .ok_or_else(|| RunError::NotFound(instrument.clone()))?;
    Ok(pivot_position(&analysis, price))
}
