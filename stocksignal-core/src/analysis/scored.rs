//! Scored multi-factor analyzer.
//!
//! Each test adds weighted points to exactly one action and appends one
//! reason. Tests run in a fixed order (RSI, MA, MACD, Bollinger, volume,
//! support/resistance), so reason order is reproducible. The final action is
//! the highest score; ties resolve by [`Action::PRIORITY`].

use super::{
    volume_spike, AnalysisError, AnalysisResult, CoreIndicators, SignalAnalyzer, TradePlan,
};
use crate::domain::Action;
use crate::indicators::IndicatorSet;
use serde::Serialize;

/// Per-action integer scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub buy: u32,
    pub sell: u32,
    pub hold: u32,
}

impl Scoreboard {
    pub fn add(&mut self, action: Action, points: u32) {
        match action {
            Action::Buy => self.buy += points,
            Action::Sell => self.sell += points,
            Action::Hold => self.hold += points,
        }
    }

    pub fn get(&self, action: Action) -> u32 {
        match action {
            Action::Buy => self.buy,
            Action::Sell => self.sell,
            Action::Hold => self.hold,
        }
    }

    /// Highest-scoring action; the first in priority order wins a tie.
    pub fn winner(&self) -> Action {
        let mut best = Action::PRIORITY[0];
        for action in Action::PRIORITY.into_iter().skip(1) {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }
}

/// Scores and reasons before the entry plan is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEvaluation {
    pub scores: Scoreboard,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoredAnalyzer;

impl ScoredAnalyzer {
    /// Run every scoring test against `set`.
    pub fn evaluate(&self, set: &IndicatorSet) -> Result<ScoredEvaluation, AnalysisError> {
        let ind = CoreIndicators::require(set)?;
        let mut scores = Scoreboard::default();
        let mut reasons = Vec::with_capacity(7);

        // RSI
        if ind.rsi < 30.0 {
            scores.add(Action::Buy, 2);
            reasons.push(format!("RSI ({:.2}) indicates oversold.", ind.rsi));
        } else if ind.rsi > 70.0 {
            scores.add(Action::Sell, 2);
            reasons.push(format!("RSI ({:.2}) indicates overbought.", ind.rsi));
        } else {
            scores.add(Action::Hold, 1);
            reasons.push(format!("RSI ({:.2}) is neutral.", ind.rsi));
        }

        // Moving average cross
        if ind.short_ma > ind.long_ma {
            scores.add(Action::Buy, 1);
            reasons.push(format!(
                "Short MA ({:.2}) above Long MA ({:.2}).",
                ind.short_ma, ind.long_ma
            ));
        } else {
            scores.add(Action::Hold, 1);
            reasons.push(format!(
                "Short MA ({:.2}) below Long MA ({:.2}).",
                ind.short_ma, ind.long_ma
            ));
        }

        // MACD
        if ind.macd > ind.macd_signal {
            scores.add(Action::Buy, 1);
            reasons.push(format!(
                "MACD ({:.2}) above Signal Line ({:.2}).",
                ind.macd, ind.macd_signal
            ));
        } else {
            scores.add(Action::Sell, 1);
            reasons.push(format!(
                "MACD ({:.2}) below Signal Line ({:.2}).",
                ind.macd, ind.macd_signal
            ));
        }

        // Bollinger Bands
        if ind.last_close < ind.lower_band {
            scores.add(Action::Buy, 1);
            reasons.push(format!(
                "Price ({:.2}) near or below lower Bollinger Band ({:.2}).",
                ind.last_close, ind.lower_band
            ));
        } else if ind.last_close > ind.upper_band {
            scores.add(Action::Sell, 1);
            reasons.push(format!(
                "Price ({:.2}) near or above upper Bollinger Band ({:.2}).",
                ind.last_close, ind.upper_band
            ));
        } else {
            scores.add(Action::Hold, 1);
            reasons.push(format!("Price ({:.2}) between Bollinger Bands.", ind.last_close));
        }

        // Volume spike: no reason when it doesn't fire
        if let Some((volume, avg_volume)) = volume_spike(set) {
            scores.add(Action::Buy, 1);
            reasons.push(format!(
                "Volume spike detected: Volume ({volume:.0}) is above average ({avg_volume:.0})."
            ));
        }

        // Support takes priority over resistance
        let near_support = set.support.filter(|s| ind.last_close <= s * 1.02);
        let near_resistance = set.resistance.filter(|r| ind.last_close >= r * 0.98);
        if let Some(support) = near_support {
            scores.add(Action::Buy, 2);
            reasons.push(format!("Price near support ({support:.2})."));
        } else if let Some(resistance) = near_resistance {
            scores.add(Action::Sell, 2);
            reasons.push(format!("Price near resistance ({resistance:.2})."));
        }

        Ok(ScoredEvaluation { scores, reasons })
    }
}

impl SignalAnalyzer for ScoredAnalyzer {
    fn name(&self) -> &str {
        "scored"
    }

    fn analyze(&self, indicators: &IndicatorSet) -> Result<AnalysisResult, AnalysisError> {
        let ScoredEvaluation {
            scores,
            mut reasons,
        } = self.evaluate(indicators)?;

        let plan = if scores.buy > scores.sell {
            match (indicators.support, indicators.last_close, indicators.atr) {
                (Some(support), Some(close), Some(atr)) => {
                    Some(TradePlan::from_atr(support, close, atr))
                }
                _ => None,
            }
        } else {
            None
        };

        if let (Some(plan), Some(atr)) = (plan, indicators.atr) {
            reasons.push(format!(
                "Suggested Entry: {:.2}, Stop-Loss: {:.2}, Target: {:.2} (based on ATR {:.2})",
                plan.entry_point, plan.stop_loss, plan.target_price, atr
            ));
        }

        Ok(AnalysisResult {
            action: scores.winner(),
            reasons,
            plan,
        })
    }
}
