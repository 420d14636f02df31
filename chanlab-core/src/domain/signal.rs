//! Classified buy/sell signals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    BottomDivergence,
    TopDivergence,
    FirstBuy,
    SecondBuy,
    ThirdBuy,
    FirstSell,
    SecondSell,
    ThirdSell,
}

impl SignalKind {
    pub const ALL: [SignalKind; 8] = [
        SignalKind::BottomDivergence,
        SignalKind::TopDivergence,
        SignalKind::FirstBuy,
        SignalKind::SecondBuy,
        SignalKind::ThirdBuy,
        SignalKind::FirstSell,
        SignalKind::SecondSell,
        SignalKind::ThirdSell,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::BottomDivergence => "bottom_divergence",
            SignalKind::TopDivergence => "top_divergence",
            SignalKind::FirstBuy => "first_buy",
            SignalKind::SecondBuy => "second_buy",
            SignalKind::ThirdBuy => "third_buy",
            SignalKind::FirstSell => "first_sell",
            SignalKind::SecondSell => "second_sell",
            SignalKind::ThirdSell => "third_sell",
        }
    }

    /// True for kinds that suggest opening or adding to a long position.
    pub fn is_bullish(self) -> bool {
        matches!(
            self,
            SignalKind::BottomDivergence
                | SignalKind::FirstBuy
                | SignalKind::SecondBuy
                | SignalKind::ThirdBuy
        )
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = SignalKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown signal kind '{s}'. Valid: {}", valid.join(", "))
            })
    }
}

/// A classified signal anchored at the end of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub kind: SignalKind,
    pub price: f64,
    /// Index of the stroke that triggered the signal.
    pub stroke_index: usize,
    /// Index of the pivot the rule was evaluated against, if any.
    pub reference_pivot: Option<usize>,
}
