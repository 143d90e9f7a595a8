//! Headline sentiment.
//!
//! A [`SentimentScorer`] maps one headline to a polarity in [-1, 1]. The
//! report is the mean polarity over at most [`MAX_HEADLINES`] titles,
//! classified with [`Sentiment::from_polarity`]. No titles means Neutral.

pub mod lexicon;

pub use lexicon::LexiconScorer;

use crate::domain::Sentiment;
use crate::news::MAX_HEADLINES;
use serde::Serialize;

/// Polarity scorer for short texts.
pub trait SentimentScorer: Send + Sync {
    fn name(&self) -> &str;

    /// Polarity in [-1, 1]; 0 for text with no opinion words.
    fn score(&self, text: &str) -> f64;
}

/// Sentiment label together with the titles it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub sentiment: Sentiment,
    pub polarity: f64,
    pub news_titles: Vec<String>,
}

impl SentimentReport {
    /// Neutral with no supporting titles.
    pub fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            polarity: 0.0,
            news_titles: Vec::new(),
        }
    }

    /// Score `titles` (already in provider order) and classify the mean.
    pub fn from_titles(scorer: &dyn SentimentScorer, mut titles: Vec<String>) -> Self {
        titles.truncate(MAX_HEADLINES);
        if titles.is_empty() {
            return Self::neutral();
        }
        let total: f64 = titles.iter().map(|t| scorer.score(t).clamp(-1.0, 1.0)).sum();
        let polarity = total / titles.len() as f64;
        Self {
            sentiment: Sentiment::from_polarity(polarity),
            polarity,
            news_titles: titles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scores by the first character: '+' positive, '-' negative.
    struct SignScorer;

    impl SentimentScorer for SignScorer {
        fn name(&self) -> &str {
            "sign"
        }

        fn score(&self, text: &str) -> f64 {
            match text.chars().next() {
                Some('+') => 1.0,
                Some('-') => -1.0,
                _ => 0.0,
            }
        }
    }

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_is_neutral() {
        let report = SentimentReport::from_titles(&SignScorer, vec![]);
        assert_eq!(report, SentimentReport::neutral());
    }

    #[test]
    fn mean_polarity_is_classified() {
        let report = SentimentReport::from_titles(&SignScorer, titles(&["+a", "+b", "c"]));
        assert_eq!(report.sentiment, Sentiment::Positive);
        assert!((report.polarity - 2.0 / 3.0).abs() < 1e-12);

        let report = SentimentReport::from_titles(&SignScorer, titles(&["-a", "b", "c"]));
        assert_eq!(report.sentiment, Sentiment::Negative);

        let report = SentimentReport::from_titles(&SignScorer, titles(&["+a", "-b"]));
        assert_eq!(report.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn only_first_twelve_titles_count() {
        let mut items: Vec<String> = (0..12).map(|i| format!("n{i}")).collect();
        items.extend((0..10).map(|i| format!("+{i}")));
        let report = SentimentReport::from_titles(&SignScorer, items);
        assert_eq!(report.news_titles.len(), 12);
        assert_eq!(report.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn threshold_is_exclusive() {
        // 1 positive in 10 → mean exactly 0.1
        let mut items = titles(&["+x"]);
        items.extend((0..9).map(|i| format!("n{i}")));
        let report = SentimentReport::from_titles(&SignScorer, items);
        assert_eq!(report.sentiment, Sentiment::Neutral);
    }
}
