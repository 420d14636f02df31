//! Per-instrument serialized recomputation.
//!
//! Each instrument has its own mutex in a registry. Recomputing an
//! instrument holds that mutex across analysis and the repository write, so
//! at most one recomputation per instrument is in flight and readers never
//! see a half-replaced result. Different instruments proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use chanlab_core::domain::{Bar, InstrumentId};
use chanlab_core::momentum::MomentumSource;
use chanlab_core::{analyze_with_source, Analysis, AnalysisConfig, AnalysisError, Stage};

use crate::config::ConfigError;
use crate::data_loader::LoadError;
use crate::repository::{RepositoryError, StructureRepository};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("fingerprint serialization: {0}")]
    Fingerprint(#[from] serde_json::Error),
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("instrument '{0}' has no stored analysis")]
    NotFound(InstrumentId),
    #[error("recompute lock for '{0}' poisoned")]
    LockPoisoned(InstrumentId),
}

/// What one recomputation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputeSummary {
    pub instrument: InstrumentId,
    pub bars: usize,
    pub strokes: usize,
    pub segments: usize,
    pub pivots: usize,
    pub signals: usize,
    pub insufficient: Option<Stage>,
    pub fingerprint: String,
}

impl RecomputeSummary {
    fn of(analysis: &Analysis, bars: usize) -> Result<Self, RunError> {
        Ok(Self {
            instrument: analysis.instrument.clone(),
            bars,
            strokes: analysis.strokes.len(),
            segments: analysis.segments.len(),
            pivots: analysis.pivots.len(),
            signals: analysis.signals.len(),
            insufficient: analysis.insufficient,
            fingerprint: analysis.fingerprint()?,
        })
    }
}

pub struct Recomputer {
    repository: Arc<dyn StructureRepository>,
    momentum: Arc<dyn MomentumSource>,
    config: AnalysisConfig,
    locks: Mutex<HashMap<InstrumentId, Arc<Mutex<()>>>>,
}

impl Recomputer {
    pub fn new(
        repository: Arc<dyn StructureRepository>,
        momentum: Arc<dyn MomentumSource>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            repository,
            momentum,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &dyn StructureRepository {
        self.repository.as_ref()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The instrument's mutex, created on first use.
    ///
    /// Entries are never evicted, so the registry grows with the number of
    /// distinct instruments this `Recomputer` has seen.
    fn lock_for(&self, instrument: &InstrumentId) -> Result<Arc<Mutex<()>>, RunError> {
        let mut registry = self
            .locks
            .lock()
            .map_err(|_| RunError::LockPoisoned(instrument.clone()))?;
        Ok(Arc::clone(registry.entry(instrument.clone()).or_default()))
    }

    /// Re-run the full pipeline over `bars` and replace the stored result.
    pub fn recompute(
        &self,
        instrument: &InstrumentId,
        bars: &[Bar],
    ) -> Result<RecomputeSummary, RunError> {
        let lock = self.lock_for(instrument)?;
        let _guard = lock
            .lock()
            .map_err(|_| RunError::LockPoisoned(instrument.clone()))?;

        let analysis =
            analyze_with_source(instrument.clone(), bars, self.momentum.as_ref(), &self.config)?;
        self.repository.replace(&analysis)?;

        let summary = RecomputeSummary::of(&analysis, bars.len())?;
        info!(
            %instrument,
            bars = summary.bars,
            strokes = summary.strokes,
            pivots = summary.pivots,
            signals = summary.signals,
            "recomputed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use chanlab_core::indicators::MacdHistogram;
    use chanlab_core::synthetic::random_walk;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bars(name: &str) -> Vec<Bar> {
        random_walk(
            name,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn recomputer(repo: Arc<dyn StructureRepository>) -> Recomputer {
        Recomputer::new(
            repo,
            Arc::new(MacdHistogram::default()),
            AnalysisConfig::default(),
        )
    }

    /// Counts concurrent `replace` calls per instrument and records the peak.
    #[derive(Default)]
    struct OverlapCounter {
        inner: InMemoryRepository,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StructureRepository for OverlapCounter {
        fn replace(&self, analysis: &Analysis) -> Result<(), RepositoryError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(2));
            let result = self.inner.replace(analysis);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn load(&self, instrument: &InstrumentId) -> Result<Option<Analysis>, RepositoryError> {
            self.inner.load(instrument)
        }

        fn instruments(&self) -> Result<Vec<InstrumentId>, RepositoryError> {
            self.inner.instruments()
        }
    }

    #[test]
    fn recompute_stores_the_analysis() {
        let repo = Arc::new(InMemoryRepository::new());
        let r = recomputer(repo.clone());
        let summary = r.recompute(&"SPY".into(), &bars("SPY")).unwrap();

        let stored = repo.load(&"SPY".into()).unwrap().unwrap();
        assert_eq!(stored.strokes.len(), summary.strokes);
        assert_eq!(stored.fingerprint().unwrap(), summary.fingerprint);
    }

    #[test]
    fn malformed_bars_leave_store_untouched() {
        let repo = Arc::new(InMemoryRepository::new());
        let r = recomputer(repo.clone());
        let mut input = bars("SPY");
        input.swap(3, 4);
        let err = r.recompute(&"SPY".into(), &input).unwrap_err();
        assert!(matches!(err, RunError::Analysis(AnalysisError::MalformedInput { .. })));
        assert!(repo.load(&"SPY".into()).unwrap().is_none());
    }

    #[test]
    fn same_instrument_recomputations_never_overlap() {
        let counter = Arc::new(OverlapCounter::default());
        let r = Arc::new(recomputer(counter.clone()));
        let input = Arc::new(bars("SPY"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                let input = Arc::clone(&input);
                std::thread::spawn(move || r.recompute(&"SPY".into(), &input).unwrap())
            })
            .collect();
        let fingerprints: Vec<String> = handles
            .into_iter()
            .map(|h| h.join().unwrap().fingerprint)
            .collect();

        assert_eq!(counter.peak.load(Ordering::SeqCst), 1);
        assert!(fingerprints.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn lock_registry_holds_one_entry_per_instrument() {
        let r = recomputer(Arc::new(InMemoryRepository::new()));
        let first = r.lock_for(&"SPY".into()).unwrap();
        let again = r.lock_for(&"SPY".into()).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        r.lock_for(&"QQQ".into()).unwrap();
        assert_eq!(r.locks.lock().unwrap().len(), 2);
    }
}
