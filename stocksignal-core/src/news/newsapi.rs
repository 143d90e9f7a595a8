//! newsapi.org `/v2/everything` keyword search.
//!
//! The API key is injected at construction and sent as `X-Api-Key`, never in
//! the query string.

use super::{network_error, Headline, NewsError, NewsProvider};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

pub struct NewsApiProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    language: String,
    page_size: usize,
}

impl NewsApiProvider {
    pub fn new(
        api_key: impl Into<String>,
        language: impl Into<String>,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self, NewsError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NewsError::Config(
                "newsapi source needs an API key (news.api_key or NEWS_API_KEY)".into(),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NewsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            language: language.into(),
            page_size: page_size.clamp(1, 100),
        })
    }

    fn parse(body: EverythingResponse) -> Result<Vec<Headline>, NewsError> {
        if body.status != "ok" {
            let code = body.code.unwrap_or_default();
            let message = body.message.unwrap_or_else(|| "unknown error".into());
            return Err(match code.as_str() {
                "apiKeyInvalid" | "apiKeyMissing" | "apiKeyDisabled" => {
                    NewsError::Unauthorized(message)
                }
                "rateLimited" => NewsError::RateLimited,
                _ => NewsError::Format(format!("{code}: {message}")),
            });
        }

        Ok(body
            .articles
            .into_iter()
            .filter_map(|a| {
                Some(Headline {
                    title: a.title?,
                    link: a.url,
                    published_at: a.published_at,
                })
            })
            .collect())
    }
}

impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "newsapi"
    }

    fn fetch_headlines(&self, query: &str) -> Result<Vec<Headline>, NewsError> {
        let page_size = self.page_size.to_string();
        let resp = self
            .client
            .get(EVERYTHING_URL)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("sortBy", "publishedAt"),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .map_err(network_error)?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NewsError::RateLimited);
        }

        // Errors carry a JSON body with a code, so parse before checking status
        let body: EverythingResponse = resp
            .json()
            .map_err(|e| NewsError::Format(format!("HTTP {status}: {e}")))?;
        let headlines = Self::parse(body).map_err(|e| match e {
            NewsError::Format(message) if !status.is_success() => NewsError::Upstream {
                status: status.as_u16(),
                message,
            },
            other => other,
        })?;

        tracing::debug!(query, count = headlines.len(), "newsapi headlines");
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<Headline>, NewsError> {
        NewsApiProvider::parse(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn parses_articles_in_order() {
        let headlines = parse(
            r#"{"status":"ok","totalResults":3,"articles":[
                {"source":{"id":null,"name":"Reuters"},"title":"Apple beats estimates","url":"https://example.com/a","publishedAt":"2024-05-02T20:31:00Z"},
                {"title":null,"url":"https://example.com/b"},
                {"title":"Apple shares slip","url":null,"publishedAt":null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Apple beats estimates");
        assert_eq!(headlines[0].link.as_deref(), Some("https://example.com/a"));
        assert!(headlines[0].published_at.is_some());
        assert_eq!(headlines[1].title, "Apple shares slip");
    }

    #[test]
    fn invalid_key_is_unauthorized() {
        let err = parse(
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, NewsError::Unauthorized(_)));
    }

    #[test]
    fn rate_limit_code() {
        let err = parse(r#"{"status":"error","code":"rateLimited","message":"slow down"}"#)
            .unwrap_err();
        assert!(matches!(err, NewsError::RateLimited));
    }

    #[test]
    fn blank_key_is_rejected_up_front() {
        let err = NewsApiProvider::new("  ", "en", 12, Duration::from_secs(5)).err();
        assert!(matches!(err, Some(NewsError::Config(_))));
    }
}
