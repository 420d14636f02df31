//! Structure repository: the only place analyses are persisted.
//!
//! Writes are full replacements. The engine never writes; the recomputer
//! calls `replace` while holding the instrument's lock.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;

use chanlab_core::domain::InstrumentId;
use chanlab_core::Analysis;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store I/O at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("instrument name '{0}' cannot be used as a store key")]
    InvalidInstrument(InstrumentId),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence seam for analysis results.
pub trait StructureRepository: Send + Sync {
    /// Replace everything stored for `analysis.instrument`.
    fn replace(&self, analysis: &Analysis) -> Result<(), RepositoryError>;

    fn load(&self, instrument: &InstrumentId) -> Result<Option<Analysis>, RepositoryError>;

    /// Stored instruments, sorted.
    fn instruments(&self) -> Result<Vec<InstrumentId>, RepositoryError>;

    /// Every stored analysis, in instrument order.
    fn load_all(&self) -> Result<Vec<Analysis>, RepositoryError> {
        let mut all = Vec::new();
        for id in self.instruments()? {
            if let Some(a) = self.load(&id)? {
                all.push(a);
            }
        }
        Ok(all)
    }
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: RwLock<HashMap<InstrumentId, Analysis>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StructureRepository for InMemoryRepository {
    fn replace(&self, analysis: &Analysis) -> Result<(), RepositoryError> {
        let mut store = self.store.write().map_err(|_| RepositoryError::Poisoned)?;
        store.insert(analysis.instrument.clone(), analysis.clone());
        Ok(())
    }

    fn load(&self, instrument: &InstrumentId) -> Result<Option<Analysis>, RepositoryError> {
        let store = self.store.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(store.get(instrument).cloned())
    }

    fn instruments(&self) -> Result<Vec<InstrumentId>, RepositoryError> {
        let store = self.store.read().map_err(|_| RepositoryError::Poisoned)?;
        let mut ids: Vec<InstrumentId> = store.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
