//! Yahoo Finance search news. Keyless; queried with the ticker symbol or
//! company name.

use super::{network_error, Headline, NewsError, NewsProvider};
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsItem {
    title: Option<String>,
    link: Option<String>,
    provider_publish_time: Option<i64>,
}

pub struct YahooNewsProvider {
    client: reqwest::blocking::Client,
    news_count: usize,
}

impl YahooNewsProvider {
    pub fn new(news_count: usize, timeout: Duration) -> Result<Self, NewsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NewsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            news_count: news_count.max(1),
        })
    }

    fn parse(body: SearchResponse) -> Vec<Headline> {
        body.news
            .into_iter()
            .filter_map(|item| {
                Some(Headline {
                    title: item.title?,
                    link: item.link,
                    published_at: item
                        .provider_publish_time
                        .and_then(|ts| DateTime::from_timestamp(ts, 0)),
                })
            })
            .collect()
    }
}

impl NewsProvider for YahooNewsProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_headlines(&self, query: &str) -> Result<Vec<Headline>, NewsError> {
        let news_count = self.news_count.to_string();
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", query),
                ("quotesCount", "0"),
                ("newsCount", news_count.as_str()),
            ])
            .send()
            .map_err(network_error)?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NewsError::RateLimited);
        }
        if !status.is_success() {
            return Err(NewsError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            });
        }

        let body: SearchResponse = resp
            .json()
            .map_err(|e| NewsError::Format(e.to_string()))?;
        let headlines = Self::parse(body);
        tracing::debug!(query, count = headlines.len(), "yahoo headlines");
        Ok(headlines)
    }
}
