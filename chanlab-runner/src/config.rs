//! Runner configuration file.
//!
//! One TOML document carries the engine sections (`[stroke]`, `[signal]`,
//! `[pivot]`), the momentum indicator (`[momentum]`) and runner settings
//! (`[runner]`). Every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chanlab_core::config::{AnalysisConfig, PivotConfig, SignalConfig, StrokeConfig};
use chanlab_core::indicators::MacdParams;

/// Errors loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub stroke: StrokeConfig,
    pub signal: SignalConfig,
    pub pivot: PivotConfig,
    pub momentum: MacdParams,
    pub runner: RunnerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Worker threads for batch recomputation.
    pub workers: usize,
    /// Directory holding one `{INSTRUMENT}.csv` per instrument.
    pub data_dir: PathBuf,
    /// Directory the JSON repository writes to.
    pub store_dir: PathBuf,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            data_dir: PathBuf::from("data"),
            store_dir: PathBuf::from("store"),
        }
    }
}

impl RunnerConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.momentum
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.runner.workers == 0 {
            return Err(ConfigError::Invalid("runner.workers must be >= 1".into()));
        }
        Ok(())
    }

    /// The engine sections as a core config.
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            stroke: self.stroke.clone(),
            signal: self.signal.clone(),
            pivot: self.pivot.clone(),
        }
    }
}
