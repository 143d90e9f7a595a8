//! Lexicon polarity scorer for financial headlines.
//!
//! Each opinion word carries a polarity in [-1, 1]. A headline scores the mean
//! over its opinion words, after two modifiers:
//! - an intensifier ("very", "sharply") multiplies the next opinion word
//! - a negator ("not", "no", "-n't") within three tokens flips the next
//!   opinion word and halves it
//!
//! Simple suffix stripping (-s, -es, -ed, -ing) maps inflections onto the
//! base entry.

use super::SentimentScorer;
use std::collections::HashMap;

const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

const BUILTIN: &[(&str, f64)] = &[
    // positive
    ("gain", 0.5),
    ("surge", 0.7),
    ("soar", 0.8),
    ("rally", 0.6),
    ("rallies", 0.6),
    ("jump", 0.5),
    ("rise", 0.4),
    ("rose", 0.4),
    ("climb", 0.4),
    ("rebound", 0.4),
    ("beat", 0.5),
    ("record", 0.4),
    ("strong", 0.6),
    ("stronger", 0.6),
    ("growth", 0.5),
    ("grow", 0.4),
    ("profit", 0.5),
    ("profitable", 0.6),
    ("upgrade", 0.6),
    ("bullish", 0.7),
    ("outperform", 0.6),
    ("boost", 0.5),
    ("win", 0.6),
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("positive", 0.6),
    ("optimistic", 0.6),
    ("success", 0.7),
    ("successful", 0.7),
    ("innovative", 0.5),
    ("expand", 0.3),
    ("approval", 0.5),
    ("approve", 0.5),
    ("dividend", 0.3),
    ("breakthrough", 0.7),
    ("top", 0.4),
    ("upbeat", 0.6),
    // negative
    ("fall", -0.4),
    ("fell", -0.4),
    ("drop", -0.4),
    ("plunge", -0.8),
    ("slump", -0.7),
    ("tumble", -0.7),
    ("crash", -0.9),
    ("sink", -0.6),
    ("sank", -0.6),
    ("slip", -0.3),
    ("loss", -0.5),
    ("lose", -0.5),
    ("lost", -0.5),
    ("miss", -0.5),
    ("weak", -0.6),
    ("weaker", -0.6),
    ("downgrade", -0.6),
    ("bearish", -0.7),
    ("underperform", -0.6),
    ("lawsuit", -0.5),
    ("sue", -0.5),
    ("probe", -0.4),
    ("investigation", -0.4),
    ("recall", -0.4),
    ("layoff", -0.5),
    ("cut", -0.3),
    ("decline", -0.4),
    ("fear", -0.6),
    ("concern", -0.4),
    ("risk", -0.3),
    ("bad", -0.7),
    ("worse", -0.8),
    ("worst", -1.0),
    ("negative", -0.6),
    ("fraud", -0.9),
    ("bankruptcy", -0.9),
    ("bankrupt", -0.9),
    ("warning", -0.5),
    ("warn", -0.5),
    ("selloff", -0.6),
    ("slowdown", -0.4),
    ("volatile", -0.3),
    ("fine", -0.3),
    ("delay", -0.3),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("sharply", 1.3),
    ("highly", 1.3),
    ("really", 1.2),
    ("significantly", 1.3),
    ("massive", 1.4),
    ("huge", 1.3),
];

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly", "neither", "nor"];

#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Scorer over the built-in financial lexicon.
    pub fn new() -> Self {
        Self {
            words: BUILTIN
                .iter()
                .map(|&(word, polarity)| (word.to_string(), polarity))
                .collect(),
        }
    }

    /// Add or override entries; polarities are clamped to [-1, 1].
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, polarity) in entries {
            self.words
                .insert(word.into().to_lowercase(), polarity.clamp(-1.0, 1.0));
        }
        self
    }

    fn lookup(&self, token: &str) -> Option<f64> {
        if let Some(&p) = self.words.get(token) {
            return Some(p);
        }
        for suffix in ["ing", "ed", "es", "s"] {
            let Some(stem) = token.strip_suffix(suffix) else {
                continue;
            };
            if stem.len() < 3 {
                continue;
            }
            if let Some(&p) = self.words.get(stem) {
                return Some(p);
            }
            if let Some(&p) = self.words.get(&format!("{stem}e")) {
                return Some(p);
            }
            // dropped -> drop
            let bytes = stem.as_bytes();
            let last = bytes[bytes.len() - 1];
            if last.is_ascii_alphabetic() && last == bytes[bytes.len() - 2] {
                if let Some(&p) = self.words.get(&stem[..stem.len() - 1]) {
                    return Some(p);
                }
            }
        }
        None
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

fn intensifier(token: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, factor)| factor)
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c: char| c == '\'' || c == '\u{2019}').replace('\u{2019}', "'"))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn score(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        let mut negation_left = 0usize;
        let mut intensity = 1.0;

        for token in tokens(text) {
            if is_negator(&token) {
                negation_left = NEGATION_WINDOW;
                intensity = 1.0;
                continue;
            }
            if let Some(factor) = intensifier(&token) {
                intensity *= factor;
                continue;
            }
            match self.lookup(&token) {
                Some(polarity) => {
                    let mut value = polarity * intensity;
                    if negation_left > 0 {
                        value *= NEGATION_FACTOR;
                        negation_left = 0;
                    }
                    total += value.clamp(-1.0, 1.0);
                    count += 1;
                    intensity = 1.0;
                }
                None => {
                    negation_left = negation_left.saturating_sub(1);
                    intensity = 1.0;
                }
            }
        }

        if count == 0 {
            0.0
        } else {
            (total / count as f64).clamp(-1.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> f64 {
        LexiconScorer::new().score(text)
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn opinion_words_average() {
        approx(score("Apple shares surge to record high"), 0.55);
        approx(score("Tesla stock plunges after weak deliveries"), -0.7);
    }

    #[test]
    fn factual_headline_is_zero() {
        assert_eq!(score("Microsoft to hold annual shareholder meeting"), 0.0);
        assert_eq!(score(""), 0.0);
    }

    #[test]
    fn inflections_resolve_to_base() {
        approx(score("Shares dropped"), -0.4);
        approx(score("Profits surged"), 0.6);
        approx(score("Analysts upgraded the stock"), 0.6);
        approx(score("Revenue misses"), -0.5);
    }

    #[test]
    fn negation_flips_and_halves() {
        approx(score("Results not good"), -0.35);
        approx(score("The quarter isn't bad"), 0.35);
        // Window: "not" reaches across two filler words
        approx(score("not a very good quarter"), -0.455);
    }

    #[test]
    fn negation_window_expires() {
        approx(score("no change in the plan for growth"), 0.5);
    }

    #[test]
    fn intensifier_scales_next_word() {
        approx(score("very strong quarter"), 0.78);
        approx(score("stock falls sharply"), -0.4);
    }

    #[test]
    fn scores_stay_bounded() {
        let s = score("extremely best extremely best");
        assert!(s <= 1.0 && s >= -1.0);
        approx(s, 1.0);
        let s = score("extremely worst crash");
        assert!(s >= -1.0);
    }

    #[test]
    fn curly_apostrophes_negate() {
        approx(score("Sales don\u{2019}t disappoint, not bad"), 0.35);
    }

    #[test]
    fn custom_entries_override() {
        let scorer = LexiconScorer::new().with_entries([("Moon", 2.0), ("record", -0.2)]);
        approx(scorer.score("to the moon"), 1.0);
        approx(scorer.score("record"), -0.2);
    }
}
