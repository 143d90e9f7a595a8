//! Yahoo Finance market-data provider.
//!
//! Fetches OHLCV bars from Yahoo's v8 chart API using `range`/`interval`.
//! Handles rate limiting, retries with exponential backoff, response parsing,
//! and the circuit breaker. The chart metadata also carries the company name,
//! which is cached for the news search.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV provider is the fallback when Yahoo is unavailable.

use super::adapter::normalize;
use super::circuit_breaker::CircuitBreaker;
use super::provider::{check_interval, period_days, DataError, MarketDataProvider, RawBar};
use crate::domain::PriceSeries;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parsed chart payload.
#[derive(Debug)]
struct Chart {
    company_name: Option<String>,
    bars: Vec<RawBar>,
}

/// Yahoo Finance market-data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
    names: Mutex<HashMap<String, String>>,
}

impl YahooProvider {
    pub fn new(
        timeout: Duration,
        max_retries: u32,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries,
            base_delay: Duration::from_millis(500),
            names: Mutex::new(HashMap::new()),
        })
    }

    fn chart_url(symbol: &str, period: &str, interval: &str) -> Result<reqwest::Url, DataError> {
        let mut url = reqwest::Url::parse(CHART_BASE)
            .map_err(|e| DataError::Other(format!("bad chart URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| DataError::Other("chart URL cannot take a path".into()))?
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", period)
            .append_pair("interval", interval)
            .append_pair("includePrePost", "false");
        Ok(url)
    }

    /// Parse the chart API response into raw rows plus metadata.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Chart, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let company_name = data.meta.long_name.or(data.meta.short_name);

        // A known symbol with nothing in range comes back without timestamps
        let Some(timestamps) = data.timestamp else {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        let bars = timestamps
            .iter()
            .enumerate()
            .map(|(i, &ts)| {
                let date = chrono::DateTime::from_timestamp(ts, 0)
                    .map(|dt| dt.naive_utc().date())
                    .ok_or_else(|| {
                        DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                    })?;
                Ok(RawBar {
                    date,
                    open: at(&quote.open, i),
                    high: at(&quote.high, i),
                    low: at(&quote.low, i),
                    close: at(&quote.close, i),
                    volume: at(&quote.volume, i),
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        Ok(Chart { company_name, bars })
    }

    /// Execute the chart request with retry and circuit breaker logic.
    fn fetch_chart(&self, symbol: &str, period: &str, interval: &str) -> Result<Chart, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = Self::chart_url(symbol, period, interval)?;
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                tracing::debug!(symbol, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(url.clone()).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            // Yahoo answers unknown symbols with 404 and a JSON error body
            if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let chart: ChartResponse = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {symbol}: {e}"
                ))
            })?;

            let parsed = Self::parse_response(symbol, chart)?;
            self.circuit_breaker.record_success();
            return Ok(parsed);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }

    /// Exponential delay before retry `attempt` (1-based), saturating.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    fn remember_name(&self, symbol: &str, name: Option<String>) {
        if let Some(name) = name {
            self.names
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(symbol.to_string(), name);
        }
    }

    fn cached_name(&self, symbol: &str) -> Option<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .cloned()
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries, DataError> {
        period_days(period, chrono::Utc::now().date_naive())?;
        check_interval(interval)?;

        let chart = self.fetch_chart(symbol, period, interval)?;
        self.remember_name(symbol, chart.company_name);
        let series = normalize(symbol, chart.bars)?;
        tracing::info!(symbol, period, interval, bars = series.len(), "fetched chart");
        Ok(series)
    }

    fn company_name(&self, symbol: &str) -> Option<String> {
        if let Some(name) = self.cached_name(symbol) {
            return Some(name);
        }
        match self.fetch_chart(symbol, "5d", "1d") {
            Ok(chart) => {
                self.remember_name(symbol, chart.company_name.clone());
                chart.company_name
            }
            Err(e) => {
                tracing::warn!(symbol, error = %e, "company name lookup failed");
                None
            }
        }
    }
}
