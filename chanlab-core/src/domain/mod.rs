//! Domain types for ChanLab

pub mod bar;
pub mod ids;
pub mod signal;
pub mod structure;

pub use bar::Bar;
pub use ids::{InstrumentId, SeriesKey, SignalKey};
pub use signal::{Signal, SignalKind};
pub use structure::{
    Direction, Fractal, FractalKind, MergedBar, Pivot, Segment, Stroke, Swing,
};
