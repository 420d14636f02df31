//! Integration tests for the runner: config file, CSV data dir, JSON store.
//!
//! Writes synthetic instruments as CSV into a temp data dir, runs a batch
//! into a JSON store, then queries the store from a fresh repository.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use chanlab_core::domain::InstrumentId;
use chanlab_core::indicators::MacdHistogram;
use chanlab_core::synthetic::random_walk;
use chanlab_runner::data_loader::{read_csv, write_csv};
use chanlab_runner::{
    discover_instruments, position_report, run_batch, scan_signals, JsonFileRepository,
    LoadOptions, Recomputer, RunnerConfig, StructureRepository,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn write_instruments(data_dir: &Path, names: &[&str], end: NaiveDate) {
    std::fs::create_dir_all(data_dir).unwrap();
    for name in names {
        let bars = random_walk(name, d(2020, 1, 1), end);
        write_csv(&data_dir.join(format!("{name}.csv")), &bars).unwrap();
    }
}

fn setup(root: &Path) -> RunnerConfig {
    let toml = format!(
        r#"
[signal]
divergence_lookback = 4

[runner]
workers = 3
data_dir = "{data}"
store_dir = "{store}"
"#,
        data = root.join("data").display(),
        store = root.join("store").display(),
    );
    let path = root.join("chanlab.toml");
    std::fs::write(&path, toml).unwrap();
    RunnerConfig::from_file(&path).unwrap()
}

fn recomputer(config: &RunnerConfig) -> Recomputer {
    Recomputer::new(
        Arc::new(JsonFileRepository::new(&config.runner.store_dir)),
        Arc::new(MacdHistogram::new(config.momentum.clone())),
        config.analysis(),
    )
}

#[test]
fn batch_then_scan_from_fresh_store() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());
    write_instruments(&config.runner.data_dir, &["AAA", "BBB", "CCC", "DDD"], d(2024, 6, 28));

    let ids = discover_instruments(&config.runner.data_dir).unwrap();
    assert_eq!(ids.len(), 4);

    let outcome = run_batch(
        &recomputer(&config),
        &ids,
        &config.runner.data_dir,
        &LoadOptions::default(),
        config.runner.workers,
    )
    .unwrap();
    assert_eq!(outcome.succeeded.len(), 4);
    assert!(outcome.failed.is_empty());

    // A fresh repository sees exactly what the batch wrote.
    let store = JsonFileRepository::new(&config.runner.store_dir);
    assert_eq!(store.instruments().unwrap(), ids);

    let analyses = store.load_all().unwrap();
    for analysis in &analyses {
        for signal in &analysis.signals {
            let hits = scan_signals(&store, signal.kind, signal.date).unwrap();
            assert!(hits.contains(&analysis.instrument));
        }
    }

    for id in &ids {
        let bars = read_csv(&config.runner.data_dir.join(format!("{id}.csv"))).unwrap();
        let close = bars.last().unwrap().close;
        let stored = store.load(id).unwrap().unwrap();
        let report = position_report(&store, id, close).unwrap();
        assert_eq!(report.is_some(), !stored.pivots.is_empty());
    }
}

#[test]
fn recompute_after_append_keeps_settled_strokes() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());
    let id = InstrumentId::new("GROW");

    let full = random_walk("GROW", d(2020, 1, 1), d(2024, 6, 28));
    let cut = full.len() - 40;
    let r = recomputer(&config);

    r.recompute(&id, &full[..cut]).unwrap();
    let before = r.repository().load(&id).unwrap().unwrap();

    r.recompute(&id, &full).unwrap();
    let after = r.repository().load(&id).unwrap().unwrap();

    let settled = before.merged_bars.len().saturating_sub(3);
    for stroke in &before.strokes {
        if before.fractals[stroke.end_fractal].bar_index <= settled {
            assert_eq!(Some(stroke), after.strokes.get(stroke.index));
        }
    }
    assert!(after.merged_bars.len() >= before.merged_bars.len());
}

#[test]
fn missing_csv_without_synthetic_is_reported_not_fatal() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());
    write_instruments(&config.runner.data_dir, &["AAA"], d(2022, 12, 30));

    let ids = vec![InstrumentId::new("AAA"), InstrumentId::new("GONE")];
    let outcome = run_batch(
        &recomputer(&config),
        &ids,
        &config.runner.data_dir,
        &LoadOptions::default(),
        1,
    )
    .unwrap();
    assert_eq!(outcome.succeeded.len(), 1);
    assert_eq!(outcome.failed[0].instrument, InstrumentId::new("GONE"));
    assert!(outcome.failed[0].error.contains("no bar file"));
}
