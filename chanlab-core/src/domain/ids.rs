use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::SignalKind;

/// Instrument identifier (ticker or exchange code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Key of a structural record: `(instrument, sequence index)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub instrument: InstrumentId,
    pub index: usize,
}

/// Key of a signal record: `(instrument, date, kind)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SignalKey {
    pub instrument: InstrumentId,
    pub date: NaiveDate,
    pub kind: SignalKind,
}
