//! Headline providers for the sentiment stage.
//!
//! A [`NewsProvider`] returns headlines for a search query (company name or
//! symbol) in provider order. Callers cap and dedupe with [`headline_titles`].

pub mod newsapi;
pub mod yahoo_news;

pub use newsapi::NewsApiProvider;
pub use yahoo_news::YahooNewsProvider;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Most headlines considered per query.
pub const MAX_HEADLINES: usize = 12;

/// One news article as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            published_at: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news provider unreachable: {0}")]
    Network(String),

    #[error("news provider rejected the API key: {0}")]
    Unauthorized(String),

    #[error("news provider rate limit reached")]
    RateLimited,

    #[error("news provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected news response: {0}")]
    Format(String),

    #[error("news provider misconfigured: {0}")]
    Config(String),
}

/// Source of headlines.
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_headlines(&self, query: &str) -> Result<Vec<Headline>, NewsError>;
}

/// Provider used when news is switched off: always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNews;

impl NewsProvider for NoNews {
    fn name(&self) -> &str {
        "none"
    }

    fn fetch_headlines(&self, _query: &str) -> Result<Vec<Headline>, NewsError> {
        Ok(Vec::new())
    }
}

/// Non-blank titles in provider order, exact duplicates removed, at most `cap`.
pub fn headline_titles(headlines: &[Headline], cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    headlines
        .iter()
        .map(|h| h.title.trim())
        .filter(|t| !t.is_empty() && *t != "[Removed]")
        .filter(|t| seen.insert(*t))
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Map a transport error from reqwest.
pub(crate) fn network_error(e: reqwest::Error) -> NewsError {
    NewsError::Network(e.to_string())
}
