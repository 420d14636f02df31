//! Engine configuration.
//!
//! Every section has defaults, so an empty TOML document yields a valid config.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub stroke: StrokeConfig,
    pub signal: SignalConfig,
    pub pivot: PivotConfig,
}

impl AnalysisConfig {
    /// Parse a config from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AnalysisError::InvalidConfig(format!("parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.signal.divergence_lookback == 0 {
            return Err(AnalysisError::InvalidConfig(
                "signal.divergence_lookback must be >= 1".into(),
            ));
        }
        if self.stroke.min_bar_gap == Some(0) {
            return Err(AnalysisError::InvalidConfig(
                "stroke.min_bar_gap must be >= 1 when set (omit it to disable)".into(),
            ));
        }
        Ok(())
    }
}

/// Stroke formation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Minimum merged-bar distance between the two fractals of a stroke.
    ///
    /// `None` leaves the gap unenforced. The classical rule uses 4.
    pub min_bar_gap: Option<usize>,
}

impl StrokeConfig {
    /// Config with the classical 4-bar separation enabled.
    pub fn classical() -> Self {
        Self {
            min_bar_gap: Some(4),
        }
    }
}

/// Signal classifier rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// How many preceding same-direction strokes a divergence is measured against.
    pub divergence_lookback: usize,
    /// Emit first/second/third sell points in addition to buy points.
    pub sell_signals: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            divergence_lookback: 4,
            sell_signals: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// Also build level-2 pivots over segments.
    pub segment_level: bool,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            segment_level: true,
        }
    }
}
