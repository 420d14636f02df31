//! Bar loading for the runner.
//!
//! Loading priority for each instrument:
//! 1. `{data_dir}/{INSTRUMENT}.csv` if present
//! 2. If missing and `synthetic` is set → seeded random walk (tagged)
//! 3. Otherwise → fail with a clear error
//!
//! Rows are returned in file order. Ordering and sanity checks belong to the
//! engine, which rejects malformed histories before any stage runs.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use chanlab_core::domain::{Bar, InstrumentId};
use chanlab_core::synthetic::random_walk;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no bar file for '{instrument}' at {path} (use --synthetic for synthetic data)")]
    Missing {
        instrument: InstrumentId,
        path: PathBuf,
    },

    #[error("read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("list {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Generate synthetic bars when no file exists.
    pub synthetic: bool,
    /// Date range for synthetic bars.
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            synthetic: false,
            start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
        }
    }
}

/// Where a bar series came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Csv(PathBuf),
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct LoadedBars {
    pub instrument: InstrumentId,
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

impl LoadedBars {
    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

/// One CSV row. Extra columns (volume, adj close) are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
}

pub fn bar_path(data_dir: &Path, instrument: &InstrumentId) -> PathBuf {
    data_dir.join(format!("{instrument}.csv"))
}

/// Load bars for one instrument.
pub fn load_bars(
    instrument: &InstrumentId,
    data_dir: &Path,
    opts: &LoadOptions,
) -> Result<LoadedBars, LoadError> {
    let path = bar_path(data_dir, instrument);
    if path.exists() {
        let bars = read_csv(&path)?;
        debug!(%instrument, bars = bars.len(), path = %path.display(), "loaded bars");
        return Ok(LoadedBars {
            instrument: instrument.clone(),
            bars,
            source: DataSource::Csv(path),
        });
    }

    if opts.synthetic {
        warn!(%instrument, "generating synthetic bars; results are tagged as synthetic");
        return Ok(LoadedBars {
            instrument: instrument.clone(),
            bars: random_walk(instrument.as_str(), opts.start, opts.end),
            source: DataSource::Synthetic,
        });
    }

    Err(LoadError::Missing {
        instrument: instrument.clone(),
        path,
    })
}

/// Parse a `date,open,high,low,close` CSV file.
pub fn read_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let to_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(to_err)?;

    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(to_err)?;
        bars.push(Bar::new(row.date, row.open, row.high, row.low, row.close));
    }
    Ok(bars)
}

/// Write bars as CSV with a header row.
pub fn write_csv(path: &Path, bars: &[Bar]) -> Result<(), LoadError> {
    let to_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_err)?;
    for bar in bars {
        writer.serialize(bar).map_err(to_err)?;
    }
    writer
        .flush()
        .map_err(|e| to_err(csv::Error::from(e)))?;
    Ok(())
}

/// Instruments with a `.csv` file in `data_dir`, sorted by name.
pub fn discover_instruments(data_dir: &Path) -> Result<Vec<InstrumentId>, LoadError> {
    let entries = std::fs::read_dir(data_dir).map_err(|source| LoadError::Dir {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            warn!(path = %path.display(), "skipping non-CSV file in data dir");
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            found.push(InstrumentId::new(stem));
        }
    }
    found.sort();
    Ok(found)
}
