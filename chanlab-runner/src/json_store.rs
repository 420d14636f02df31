//! JSON file repository.
//!
//! Layout: `{store_dir}/{INSTRUMENT}.json`, one file per instrument.
//! Writes are atomic: write to `.json.tmp` then rename into place.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use chanlab_core::domain::InstrumentId;
use chanlab_core::Analysis;

use crate::repository::{RepositoryError, StructureRepository};

pub struct JsonFileRepository {
    store_dir: PathBuf,
}

impl JsonFileRepository {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    fn path_for(&self, instrument: &InstrumentId) -> Result<PathBuf, RepositoryError> {
        let name = instrument.as_str();
        if name.is_empty() || name.starts_with('.') || name.contains(|c: char| c == '/' || c == '\\') {
            return Err(RepositoryError::InvalidInstrument(instrument.clone()));
        }
        Ok(self.store_dir.join(format!("{name}.json")))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> RepositoryError + '_ {
    move |source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl StructureRepository for JsonFileRepository {
    fn replace(&self, analysis: &Analysis) -> Result<(), RepositoryError> {
        let path = self.path_for(&analysis.instrument)?;
        fs::create_dir_all(&self.store_dir).map_err(io_err(&self.store_dir))?;

        let json = serde_json::to_vec_pretty(analysis)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_err(&tmp_path))?;

        // Atomic rename
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            io_err(&path)(e)
        })
    }

    fn load(&self, instrument: &InstrumentId) -> Result<Option<Analysis>, RepositoryError> {
        let path = self.path_for(instrument)?;
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(io_err(&path))?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn instruments(&self) -> Result<Vec<InstrumentId>, RepositoryError> {
        if !self.store_dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.store_dir).map_err(io_err(&self.store_dir))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Interrupted writes leave `.json.tmp` files; those end in "tmp".
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                warn!(path = %path.display(), "skipping non-JSON file in store");
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(InstrumentId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("store"));
        let analysis = Analysis::empty("SPY".into());
        repo.replace(&analysis).unwrap();

        assert_eq!(repo.load(&"SPY".into()).unwrap(), Some(analysis));
        assert_eq!(repo.instruments().unwrap(), vec![InstrumentId::new("SPY")]);
        assert!(!dir.path().join("store/SPY.json.tmp").exists());
    }

    #[test]
    fn missing_store_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("absent"));
        assert!(repo.instruments().unwrap().is_empty());
        assert!(repo.load(&"SPY".into()).unwrap().is_none());
    }

    #[test]
    fn leftover_tmp_files_are_not_instruments() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("QQQ.json.tmp"), b"{").unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert!(repo.instruments().unwrap().is_empty());
    }

    #[test]
    fn path_like_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let err = repo.replace(&Analysis::empty("../etc".into())).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidInstrument(_)));
    }

    #[test]
    fn corrupt_file_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("BAD.json"), b"not json").unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert!(matches!(
            repo.load(&"BAD".into()),
            Err(RepositoryError::Serde(_))
        ));
    }
}
