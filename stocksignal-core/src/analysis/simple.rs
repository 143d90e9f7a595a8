//! Single-factor quick signal: RSI extremes first, then the MA cross.

use super::{missing, AnalysisError};
use crate::domain::Action;
use crate::indicators::IndicatorSet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleSignal {
    pub signal: Action,
    pub reason: String,
}

const REQUIRED: [&str; 3] = ["rsi", "short_ma", "long_ma"];

pub fn trading_signal(set: &IndicatorSet) -> Result<SimpleSignal, AnalysisError> {
    let (Some(rsi), Some(short_ma), Some(long_ma)) = (set.rsi, set.short_ma, set.long_ma) else {
        return Err(AnalysisError::InsufficientData {
            missing: missing(set, &REQUIRED),
        });
    };

    let (signal, reason) = if rsi < 30.0 {
        (Action::Buy, format!("RSI ({rsi:.2}) indicates oversold conditions."))
    } else if rsi > 70.0 {
        (Action::Sell, format!("RSI ({rsi:.2}) indicates overbought conditions."))
    } else if short_ma > long_ma {
        (
            Action::Buy,
            format!("Short-term MA ({short_ma:.2}) crossed above Long-term MA ({long_ma:.2})."),
        )
    } else {
        (
            Action::Hold,
            format!("Short-term MA ({short_ma:.2}) is below Long-term MA ({long_ma:.2})."),
        )
    };

    Ok(SimpleSignal { signal, reason })
}
