//! Sentiment combiner and the enhanced additive signal.

use crate::analysis::{missing, AnalysisError, AnalysisResult, TradePlan};
use crate::domain::{Action, FinalAction, Sentiment};
use crate::indicators::IndicatorSet;
use crate::sentiment::SentimentReport;
use serde::Serialize;

/// Total lookup over (technical action, sentiment).
pub fn combine(technical: Action, sentiment: Sentiment) -> FinalAction {
    use Action::*;
    use Sentiment::*;

    match (technical, sentiment) {
        (Buy, Positive) => FinalAction::StrongBuy,
        (Buy, Negative) => FinalAction::HoldCaution,
        (Buy, Neutral) => FinalAction::Buy,
        (Hold, Positive) => FinalAction::SmallBuyWatchlist,
        (Hold, Negative) => FinalAction::Avoid,
        (Hold, Neutral) => FinalAction::Hold,
        (Sell, Positive) => FinalAction::HoldWait,
        (Sell, Negative | Neutral) => FinalAction::StrongSell,
    }
}

/// Technical analysis and headline sentiment merged into one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalVerdict {
    pub stock_symbol: String,
    pub technical_action: Action,
    pub technical_reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_plan: Option<TradePlan>,
    pub sentiment: Sentiment,
    pub news_titles: Vec<String>,
    pub final_action: FinalAction,
}

impl FinalVerdict {
    pub fn new(
        symbol: impl Into<String>,
        technical: AnalysisResult,
        report: SentimentReport,
    ) -> Self {
        Self {
            stock_symbol: symbol.into(),
            final_action: combine(technical.action, report.sentiment),
            technical_action: technical.action,
            technical_reasons: technical.reasons,
            trade_plan: technical.plan,
            sentiment: report.sentiment,
            news_titles: report.news_titles,
        }
    }
}

/// Additive score over a few bullish confirmations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedSignal {
    pub signal: FinalAction,
    pub score: u32,
    pub reasons: Vec<String>,
}

/// RSI < 30 (+2), short MA above long MA (+1), Positive sentiment (+1) and
/// today's volume above 1.5x its 20-day average (+1). Four or more is STRONG
/// BUY, two or more BUY, otherwise HOLD.
///
/// Volume prefers the adapter's `todays_volume`/`avg_volume_20` and falls
/// back to `volume`/`avg_volume`; the rule is skipped when neither is defined.
pub fn enhanced_signal(
    set: &IndicatorSet,
    sentiment: Sentiment,
) -> Result<EnhancedSignal, AnalysisError> {
    let (Some(rsi), Some(short_ma), Some(long_ma)) = (set.rsi, set.short_ma, set.long_ma) else {
        return Err(AnalysisError::InsufficientData {
            missing: missing(set, &["rsi", "short_ma", "long_ma"]),
        });
    };

    let mut score = 0;
    let mut reasons = Vec::new();

    if rsi < 30.0 {
        score += 2;
        reasons.push("Oversold (RSI < 30)".to_string());
    }
    if short_ma > long_ma {
        score += 1;
        reasons.push("Bullish MA Crossover".to_string());
    }
    if sentiment == Sentiment::Positive {
        score += 1;
        reasons.push("Positive News Sentiment".to_string());
    }

    let volume = set.todays_volume.or(set.volume);
    let average = set.avg_volume_20.or(set.avg_volume);
    if let (Some(volume), Some(average)) = (volume, average) {
        if volume > average * 1.5 {
            score += 1;
            reasons.push("High Volume Confirmation".to_string());
        }
    }

    let signal = match score {
        4.. => FinalAction::StrongBuy,
        2..=3 => FinalAction::Buy,
        _ => FinalAction::Hold,
    };

    Ok(EnhancedSignal {
        signal,
        score,
        reasons,
    })
}
