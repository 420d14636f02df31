//! Error and diagnostic types for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that abort an analysis before any stage runs.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("malformed input at bar {index}: {reason}")]
    MalformedInput { index: usize, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Merge,
    Fractal,
    Stroke,
    Segment,
    Pivot,
    Signal,
}

impl Stage {
    /// Minimum number of inputs the stage needs to produce anything.
    pub fn min_input(self) -> usize {
        match self {
            Stage::Merge => 1,
            Stage::Fractal => 3,
            Stage::Stroke => 2,
            Stage::Segment | Stage::Pivot => 3,
            Stage::Signal => 1,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Merge => "merge",
            Stage::Fractal => "fractal",
            Stage::Stroke => "stroke",
            Stage::Segment => "segment",
            Stage::Pivot => "pivot",
            Stage::Signal => "signal",
        };
        f.write_str(name)
    }
}
