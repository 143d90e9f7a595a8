//! Sequential-override analyzer.
//!
//! A single action starts at HOLD and each test may overwrite it. A test
//! that points the opposite way of an action already taken leaves it alone,
//! so the earliest decisive test wins. Never produces an entry plan.

use super::{volume_spike, AnalysisError, AnalysisResult, CoreIndicators, SignalAnalyzer};
use crate::domain::Action;
use crate::indicators::IndicatorSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialAnalyzer;

/// Set `action` to `to` unless it already holds the opposing `blocked_by`.
fn overwrite(action: &mut Action, to: Action, blocked_by: Action) {
    if *action != blocked_by {
        *action = to;
    }
}

impl SignalAnalyzer for SequentialAnalyzer {
    fn name(&self) -> &str {
        "sequential"
    }

    fn analyze(&self, indicators: &IndicatorSet) -> Result<AnalysisResult, AnalysisError> {
        let ind = CoreIndicators::require(indicators)?;
        let mut action = Action::Hold;
        let mut reasons = Vec::with_capacity(5);

        if ind.rsi < 30.0 {
            action = Action::Buy;
            reasons.push(format!("RSI ({:.2}) indicates oversold.", ind.rsi));
        } else if ind.rsi > 70.0 {
            action = Action::Sell;
            reasons.push(format!("RSI ({:.2}) indicates overbought.", ind.rsi));
        } else {
            reasons.push(format!("RSI ({:.2}) is neutral.", ind.rsi));
        }

        if ind.short_ma > ind.long_ma {
            overwrite(&mut action, Action::Buy, Action::Sell);
            reasons.push(format!(
                "Short MA ({:.2}) above Long MA ({:.2}).",
                ind.short_ma, ind.long_ma
            ));
        } else {
            reasons.push(format!(
                "Short MA ({:.2}) below Long MA ({:.2}).",
                ind.short_ma, ind.long_ma
            ));
        }

        if ind.macd > ind.macd_signal {
            overwrite(&mut action, Action::Buy, Action::Sell);
            reasons.push(format!(
                "MACD ({:.2}) above Signal Line ({:.2}).",
                ind.macd, ind.macd_signal
            ));
        } else {
            overwrite(&mut action, Action::Sell, Action::Buy);
            reasons.push(format!(
                "MACD ({:.2}) below Signal Line ({:.2}).",
                ind.macd, ind.macd_signal
            ));
        }

        if ind.last_close < ind.lower_band {
            overwrite(&mut action, Action::Buy, Action::Sell);
            reasons.push(format!(
                "Price ({:.2}) near or below lower Bollinger Band ({:.2}).",
                ind.last_close, ind.lower_band
            ));
        } else if ind.last_close > ind.upper_band {
            overwrite(&mut action, Action::Sell, Action::Buy);
            reasons.push(format!(
                "Price ({:.2}) near or above upper Bollinger Band ({:.2}).",
                ind.last_close, ind.upper_band
            ));
        } else {
            reasons.push(format!("Price ({:.2}) between Bollinger Bands.", ind.last_close));
        }

        // Confirmation only
        if let Some((volume, avg_volume)) = volume_spike(indicators) {
            reasons.push(format!(
                "Volume spike detected: Volume ({volume:.0}) is above average ({avg_volume:.0})."
            ));
        }

        Ok(AnalysisResult {
            action,
            reasons,
            plan: None,
        })
    }
}
