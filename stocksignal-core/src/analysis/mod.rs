//! Rule-based signal analysis.
//!
//! A [`SignalAnalyzer`] turns an [`IndicatorSet`] into an [`AnalysisResult`].
//! Two policies implement it:
//! - [`ScoredAnalyzer`]: weighted multi-factor scoring with an ATR-based
//!   entry plan (the default)
//! - [`SequentialAnalyzer`]: a single action overwritten test by test
//!
//! [`trading_signal`] is the single-factor quick signal (RSI, then MA cross).
//!
//! Analyzers never compute with undefined values: if any required indicator
//! is `None`, they fail with [`AnalysisError::InsufficientData`].

pub mod scored;
pub mod sequential;
pub mod simple;

pub use scored::{ScoredAnalyzer, ScoredEvaluation, Scoreboard};
pub use sequential::SequentialAnalyzer;
pub use simple::{trading_signal, SimpleSignal};

use crate::domain::Action;
use crate::indicators::IndicatorSet;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Analysis failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    #[error("insufficient data: undefined indicators [{}]", missing.join(", "))]
    InsufficientData { missing: Vec<&'static str> },
}

/// ATR-based entry suggestion. All three levels exist together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry_point: f64,
    pub stop_loss: f64,
    pub target_price: f64,
}

impl TradePlan {
    /// entry = max(support, close - atr), stop = entry - atr, target = entry + 2 atr.
    pub fn from_atr(support: f64, last_close: f64, atr: f64) -> Self {
        let entry_point = support.max(last_close - atr);
        Self {
            entry_point,
            stop_loss: entry_point - atr,
            target_price: entry_point + 2.0 * atr,
        }
    }
}

/// Output of a signal analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub action: Action,
    pub reasons: Vec<String>,
    pub plan: Option<TradePlan>,
}

impl Serialize for AnalysisResult {
    // Flat layout: the plan's levels are always present, null when absent
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AnalysisResult", 5)?;
        state.serialize_field("action", &self.action)?;
        state.serialize_field("reasons", &self.reasons)?;
        state.serialize_field("entry_point", &self.plan.map(|p| p.entry_point))?;
        state.serialize_field("stop_loss", &self.plan.map(|p| p.stop_loss))?;
        state.serialize_field("target_price", &self.plan.map(|p| p.target_price))?;
        state.end()
    }
}

/// Strategy interface over analysis policies.
pub trait SignalAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(&self, indicators: &IndicatorSet) -> Result<AnalysisResult, AnalysisError>;
}

/// Which analysis policy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerMode {
    #[default]
    Scored,
    Sequential,
}

impl AnalyzerMode {
    pub fn analyzer(self) -> Box<dyn SignalAnalyzer> {
        match self {
            AnalyzerMode::Scored => Box::new(ScoredAnalyzer),
            AnalyzerMode::Sequential => Box::new(SequentialAnalyzer),
        }
    }
}

impl fmt::Display for AnalyzerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerMode::Scored => f.write_str("scored"),
            AnalyzerMode::Sequential => f.write_str("sequential"),
        }
    }
}

impl std::str::FromStr for AnalyzerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scored" => Ok(AnalyzerMode::Scored),
            "sequential" => Ok(AnalyzerMode::Sequential),
            other => Err(format!("unknown analyzer mode '{other}' (expected scored or sequential)")),
        }
    }
}

/// Indicators every analysis policy needs, unwrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreIndicators {
    pub rsi: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub last_close: f64,
    pub lower_band: f64,
    pub upper_band: f64,
}

impl CoreIndicators {
    pub const REQUIRED: [&'static str; 8] = [
        "rsi",
        "short_ma",
        "long_ma",
        "macd",
        "macd_signal",
        "last_close",
        "lower_band",
        "upper_band",
    ];

    /// Unwrap the required indicators, listing every undefined one on failure.
    pub fn require(set: &IndicatorSet) -> Result<Self, AnalysisError> {
        match (
            set.rsi,
            set.short_ma,
            set.long_ma,
            set.macd,
            set.macd_signal,
            set.last_close,
            set.lower_band,
            set.upper_band,
        ) {
            (
                Some(rsi),
                Some(short_ma),
                Some(long_ma),
                Some(macd),
                Some(macd_signal),
                Some(last_close),
                Some(lower_band),
                Some(upper_band),
            ) => Ok(Self {
                rsi,
                short_ma,
                long_ma,
                macd,
                macd_signal,
                last_close,
                lower_band,
                upper_band,
            }),
            _ => Err(AnalysisError::InsufficientData {
                missing: missing(set, &Self::REQUIRED),
            }),
        }
    }
}

/// Every name in `names` whose value is undefined in `set`.
pub(crate) fn missing(set: &IndicatorSet, names: &[&'static str]) -> Vec<&'static str> {
    names
        .iter()
        .copied()
        .filter(|name| set.get(name).is_none())
        .collect()
}

/// Volume above 1.5x its average (strict). `None` when either side is undefined.
pub(crate) fn volume_spike(set: &IndicatorSet) -> Option<(f64, f64)> {
    let volume = set.volume?;
    let avg_volume = set.avg_volume?;
    (volume > 1.5 * avg_volume).then_some((volume, avg_volume))
}


#[cfg(test)]
mod tests {
    use super::test_support::neutral_set;
    use super::*;

    #[test]
    fn require_lists_every_missing_indicator() {
        let set = IndicatorSet {
            rsi: None,
            long_ma: None,
            ..neutral_set()
        };
        let err = CoreIndicators::require(&set).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                missing: vec!["rsi", "long_ma"]
            }
        );
        assert_eq!(
            err.to_string(),
            "insufficient data: undefined indicators [rsi, long_ma]"
        );
    }

    #[test]
    fn require_unwraps_defined_set() {
        let core = CoreIndicators::require(&neutral_set()).unwrap();
        assert_eq!(core.rsi, 50.0);
        assert_eq!(core.upper_band, 110.0);
    }

    #[test]
    fn trade_plan_uses_support_floor() {
        // close - atr = 97 is above support 95 → entry 97
        let plan = TradePlan::from_atr(95.0, 100.0, 3.0);
        assert_eq!(plan.entry_point, 97.0);
        assert_eq!(plan.stop_loss, 94.0);
        assert_eq!(plan.target_price, 103.0);

        // close - atr = 90 is below support 95 → entry 95
        let plan = TradePlan::from_atr(95.0, 100.0, 10.0);
        assert_eq!(plan.entry_point, 95.0);
    }

    #[test]
    fn result_serializes_absent_plan_as_null() {
        let result = AnalysisResult {
            action: Action::Hold,
            reasons: vec!["RSI (50.00) is neutral.".into()],
            plan: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action"], "HOLD");
        assert!(json["entry_point"].is_null());
        assert!(json["stop_loss"].is_null());
        assert!(json["target_price"].is_null());
    }

    #[test]
    fn mode_parses_and_selects_analyzer() {
        assert_eq!("scored".parse::<AnalyzerMode>().unwrap(), AnalyzerMode::Scored);
        assert_eq!(
            "sequential".parse::<AnalyzerMode>().unwrap(),
            AnalyzerMode::Sequential
        );
        assert!("random".parse::<AnalyzerMode>().is_err());
        assert_eq!(AnalyzerMode::Sequential.analyzer().name(), "sequential");
        assert_eq!(AnalyzerMode::default().analyzer().name(), "scored");
    }

    #[test]
    fn volume_spike_is_strict() {
        let mut set = neutral_set();
        set.volume = Some(1500.0);
        assert_eq!(volume_spike(&set), None);
        set.volume = Some(1500.1);
        assert!(volume_spike(&set).is_some());
        set.avg_volume = None;
        assert_eq!(volume_spike(&set), None);
    }
}
