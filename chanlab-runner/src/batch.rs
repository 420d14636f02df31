//! Parallel recomputation across instruments.
//!
//! Instruments fan out over a dedicated rayon pool sized by
//! `runner.workers`. Per-instrument failures are collected rather than
//! aborting the batch.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use chanlab_core::domain::InstrumentId;

use crate::data_loader::{load_bars, LoadOptions};
use crate::recompute::{RecomputeSummary, Recomputer, RunError};

/// An instrument that could not be recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedInstrument {
    pub instrument: InstrumentId,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<RecomputeSummary>,
    pub failed: Vec<FailedInstrument>,
    pub synthetic: Vec<InstrumentId>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Load and recompute every instrument on a pool of `workers` threads.
pub fn run_batch(
    recomputer: &Recomputer,
    instruments: &[InstrumentId],
    data_dir: &Path,
    opts: &LoadOptions,
    workers: usize,
) -> Result<BatchOutcome, RunError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let results: Vec<(InstrumentId, bool, Result<RecomputeSummary, RunError>)> = pool.install(|| {
        instruments
            .par_iter()
            .map(|id| match load_bars(id, data_dir, opts) {
                Ok(loaded) => {
                    let synthetic = loaded.is_synthetic();
                    (id.clone(), synthetic, recomputer.recompute(id, &loaded.bars))
                }
                Err(e) => (id.clone(), false, Err(RunError::from(e))),
            })
            .collect()
    });

    let mut outcome = BatchOutcome::default();
    for (instrument, synthetic, result) in results {
        if synthetic {
            outcome.synthetic.push(instrument.clone());
        }
        match result {
            Ok(summary) => outcome.succeeded.push(summary),
            Err(e) => {
                warn!(%instrument, error = %e, "recompute failed");
                outcome.failed.push(FailedInstrument {
                    instrument,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        workers,
        "batch complete"
    );
    Ok(outcome)
}
