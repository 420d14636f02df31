//! MACD histogram — the default momentum source.
//!
//! DIF = EMA(close, fast) - EMA(close, slow)
//! DEA = EMA(DIF, signal), seeded after DIF's warmup
//! Histogram = DIF - DEA
//! Lookback: slow - 1 + signal - 1.

use serde::{Deserialize, Serialize};

use super::ema::{ema_after_warmup, ema_of_series};
use crate::domain::Bar;
use crate::error::AnalysisError;
use crate::momentum::{MomentumSeries, MomentumSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl MacdParams {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.fast == 0 || self.signal == 0 {
            return Err(AnalysisError::InvalidConfig(
                "momentum periods must be >= 1".into(),
            ));
        }
        if self.fast >= self.slow {
            return Err(AnalysisError::InvalidConfig(format!(
                "momentum.fast ({}) must be below momentum.slow ({})",
                self.fast, self.slow
            )));
        }
        Ok(())
    }

    pub fn lookback(&self) -> usize {
        self.slow.saturating_sub(1) + self.signal.saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
pub struct MacdHistogram {
    params: MacdParams,
    name: String,
}

impl MacdHistogram {
    pub fn new(params: MacdParams) -> Self {
        let name = format!(
            "macd_hist_{}_{}_{}",
            params.fast, params.slow, params.signal
        );
        Self { params, name }
    }

    /// Histogram values index-aligned with `bars`; warmup positions are NaN.
    pub fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.params.fast);
        let slow = ema_of_series(&closes, self.params.slow);
        let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let dea = ema_after_warmup(&dif, self.params.signal);
        dif.iter().zip(&dea).map(|(d, e)| d - e).collect()
    }
}

impl Default for MacdHistogram {
    fn default() -> Self {
        Self::new(MacdParams::default())
    }
}

impl MomentumSource for MacdHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn series(&self, bars: &[Bar]) -> MomentumSeries {
        MomentumSeries::aligned(bars, &self.compute(bars))
    }
}
