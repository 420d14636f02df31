//! Structural decomposition stages.
//!
//! Each stage is a pure function over the previous stage's output:
//! bars → merged bars → fractals → strokes → {segments, pivots}.

pub mod fractal;
pub mod merge;
pub mod pivot;
pub mod segment;
pub mod stroke;

pub use fractal::detect_fractals;
pub use merge::merge_bars;
pub use pivot::{build_pivots, SEGMENT_LEVEL, STROKE_LEVEL};
pub use segment::build_segments;
pub use stroke::{build_strokes, step, Rejection, StepOutcome, StrokeState};
