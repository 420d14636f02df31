//! ChanLab Runner — recomputation orchestration around the pure engine.
//!
//! This crate builds on `chanlab-core` to provide:
//! - TOML config files covering engine, momentum and runner settings
//! - Bar loading from CSV with a synthetic fallback
//! - A structure repository (in-memory and JSON files, full-replace writes)
//! - Per-instrument serialized recomputation
//! - Parallel batch runs across instruments
//! - Selection queries (signal scans, pivot position reports)

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod json_store;
pub mod recompute;
pub mod repository;
pub mod scan;

pub use batch::{run_batch, BatchOutcome, FailedInstrument};
pub use config::{ConfigError, RunnerConfig, RunnerSettings};
pub use data_loader::{discover_instruments, load_bars, DataSource, LoadError, LoadOptions, LoadedBars};
pub use json_store::JsonFileRepository;
pub use recompute::{RecomputeSummary, Recomputer, RunError};
pub use repository::{InMemoryRepository, RepositoryError, StructureRepository};
pub use scan::{position_report, scan_signals};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn recomputer_is_send_sync() {
        assert_send::<Recomputer>();
        assert_sync::<Recomputer>();
    }

    #[test]
    fn repositories_are_send_sync() {
        assert_send::<InMemoryRepository>();
        assert_sync::<InMemoryRepository>();
        assert_send::<JsonFileRepository>();
        assert_sync::<JsonFileRepository>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunnerConfig>();
        assert_sync::<RunnerConfig>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }

    #[test]
    fn results_are_send_sync() {
        assert_send::<RecomputeSummary>();
        assert_sync::<RecomputeSummary>();
        assert_send::<BatchOutcome>();
        assert_sync::<BatchOutcome>();
        assert_send::<RunError>();
    }
}
