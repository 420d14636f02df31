//! Full-pipeline entry point.
//!
//! `analyze` validates the bar history, then runs every stage in order:
//! merge → fractal → stroke → {segment, pivot} → signal. It is a pure function;
//! running it twice on the same input yields identical output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::domain::{
    Bar, Fractal, InstrumentId, MergedBar, Pivot, Segment, SeriesKey, Signal, SignalKey,
    SignalKind, Stroke,
};
use crate::error::{AnalysisError, Stage};
use crate::momentum::{MomentumSeries, MomentumSource};
use crate::signals::classify;
use crate::structure::{
    build_pivots, build_segments, build_strokes, detect_fractals, merge_bars, SEGMENT_LEVEL,
    STROKE_LEVEL,
};

/// Complete structural decomposition of one instrument's bar history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub instrument: InstrumentId,
    pub merged_bars: Vec<MergedBar>,
    pub fractals: Vec<Fractal>,
    pub strokes: Vec<Stroke>,
    pub segments: Vec<Segment>,
    /// Level-1 pivots over strokes.
    pub pivots: Vec<Pivot>,
    /// Level-2 pivots over segments (empty when disabled).
    pub segment_pivots: Vec<Pivot>,
    pub signals: Vec<Signal>,
    /// First stage that did not have enough input; it and every later stage are empty.
    pub insufficient: Option<Stage>,
}

impl Analysis {
    pub fn empty(instrument: InstrumentId) -> Self {
        Self {
            instrument,
            merged_bars: Vec::new(),
            fractals: Vec::new(),
            strokes: Vec::new(),
            segments: Vec::new(),
            pivots: Vec::new(),
            segment_pivots: Vec::new(),
            signals: Vec::new(),
            insufficient: None,
        }
    }

    /// BLAKE3 hash over the serialized collections, hex encoded.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub fn latest_pivot(&self) -> Option<&Pivot> {
        self.pivots.last()
    }

    pub fn signals_on(&self, date: NaiveDate) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.date == date)
    }

    pub fn has_signal(&self, kind: SignalKind, date: NaiveDate) -> bool {
        self.signals_on(date).any(|s| s.kind == kind)
    }

    pub fn signal_keys(&self) -> Vec<SignalKey> {
        self.signals
            .iter()
            .map(|s| SignalKey {
                instrument: self.instrument.clone(),
                date: s.date,
                kind: s.kind,
            })
            .collect()
    }

    pub fn stroke_keys(&self) -> Vec<SeriesKey> {
        self.strokes
            .iter()
            .map(|s| SeriesKey {
                instrument: self.instrument.clone(),
                index: s.index,
            })
            .collect()
    }
}

/// Reject histories that are not strictly ascending by date or hold unusable bars.
pub fn validate_bars(bars: &[Bar]) -> Result<(), AnalysisError> {
    for (index, bar) in bars.iter().enumerate() {
        if bar.is_void() {
            return Err(AnalysisError::MalformedInput {
                index,
                reason: format!("NaN price on {}", bar.date),
            });
        }
        if bar.high < bar.low {
            return Err(AnalysisError::MalformedInput {
                index,
                reason: format!("high {} below low {} on {}", bar.high, bar.low, bar.date),
            });
        }
        if index > 0 {
            let prev = bars[index - 1].date;
            if bar.date == prev {
                return Err(AnalysisError::MalformedInput {
                    index,
                    reason: format!("duplicate date {}", bar.date),
                });
            }
            if bar.date < prev {
                return Err(AnalysisError::MalformedInput {
                    index,
                    reason: format!("date {} out of order (after {prev})", bar.date),
                });
            }
        }
    }
    Ok(())
}

/// Run the full pipeline with a caller-supplied momentum series.
pub fn analyze(
    instrument: InstrumentId,
    bars: &[Bar],
    momentum: &MomentumSeries,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    config.validate()?;
    validate_bars(bars)?;

    let mut analysis = Analysis::empty(instrument);
    if bars.len() < Stage::Merge.min_input() {
        analysis.insufficient = Some(Stage::Merge);
        return Ok(analysis);
    }

    analysis.merged_bars = merge_bars(bars);
    if analysis.merged_bars.len() < Stage::Fractal.min_input() {
        analysis.insufficient = Some(Stage::Fractal);
        return Ok(finish(analysis));
    }

    analysis.fractals = detect_fractals(&analysis.merged_bars);
    if analysis.fractals.len() < Stage::Stroke.min_input() {
        analysis.insufficient = Some(Stage::Stroke);
        return Ok(finish(analysis));
    }

    analysis.strokes = build_strokes(&analysis.fractals, &config.stroke);
    if analysis.strokes.len() < Stage::Segment.min_input() {
        analysis.insufficient = Some(Stage::Segment);
        return Ok(finish(analysis));
    }

    analysis.segments = build_segments(&analysis.strokes);
    analysis.pivots = build_pivots(&analysis.strokes, STROKE_LEVEL);
    if config.pivot.segment_level {
        analysis.segment_pivots = build_pivots(&analysis.segments, SEGMENT_LEVEL);
    }
    analysis.signals = classify(
        &analysis.strokes,
        &analysis.pivots,
        momentum,
        &config.signal,
    );

    Ok(finish(analysis))
}

/// Run the full pipeline, deriving momentum from the bars.
pub fn analyze_with_source(
    instrument: InstrumentId,
    bars: &[Bar],
    source: &dyn MomentumSource,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let momentum = source.series(bars);
    analyze(instrument, bars, &momentum, config)
}

fn finish(analysis: Analysis) -> Analysis {
    debug!(
        instrument = %analysis.instrument,
        merged = analysis.merged_bars.len(),
        fractals = analysis.fractals.len(),
        strokes = analysis.strokes.len(),
        segments = analysis.segments.len(),
        pivots = analysis.pivots.len(),
        signals = analysis.signals.len(),
        insufficient = ?analysis.insufficient,
        "analysis complete"
    );
    analysis
}
