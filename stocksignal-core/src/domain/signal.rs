//! Signal vocabulary: technical actions, sentiment labels, final verdict actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Technical action produced by the signal analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Tie-break order for score ties: earlier entries win.
    pub const PRIORITY: [Action; 3] = [Action::Buy, Action::Sell, Action::Hold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate headline sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Classify a mean polarity: > 0.1 positive, < -0.1 negative.
    pub fn from_polarity(mean: f64) -> Self {
        if mean > 0.1 {
            Sentiment::Positive
        } else if mean < -0.1 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graded recommendation after combining technicals with sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinalAction {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD / CAUTION")]
    HoldCaution,
    #[serde(rename = "SMALL BUY / WATCHLIST")]
    SmallBuyWatchlist,
    #[serde(rename = "AVOID")]
    Avoid,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "HOLD / WAIT")]
    HoldWait,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl FinalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalAction::StrongBuy => "STRONG BUY",
            FinalAction::Buy => "BUY",
            FinalAction::HoldCaution => "HOLD / CAUTION",
            FinalAction::SmallBuyWatchlist => "SMALL BUY / WATCHLIST",
            FinalAction::Avoid => "AVOID",
            FinalAction::Hold => "HOLD",
            FinalAction::HoldWait => "HOLD / WAIT",
            FinalAction::StrongSell => "STRONG SELL",
        }
    }
}

impl fmt::Display for FinalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
