//! ChanLab Core: structural decomposition of daily price bars.
//!
//! The pipeline runs strictly forward:
//! - Bar merging under containment
//! - Top/bottom fractal detection
//! - Strokes between alternating fractals
//! - Segments from stroke triples, pivots from overlapping swings
//! - Signal classification (divergence, first/second/third buy and sell points)
//!
//! Everything here is pure computation; persistence and I/O live in the runner.

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod momentum;
pub mod query;
pub mod signals;
pub mod structure;
pub mod synthetic;

pub use analysis::{analyze, analyze_with_source, Analysis};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Stage};
