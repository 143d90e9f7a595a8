//! Market-data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (Yahoo Finance,
//! CSV files, synthetic bars) so the pipeline can swap implementations and
//! mock them in tests.

use crate::domain::{PriceSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lookback range for a fetch.
pub const DEFAULT_PERIOD: &str = "1y";
/// Default bar interval for a fetch.
pub const DEFAULT_INTERVAL: &str = "1d";

/// Intervals whose bars map one-to-one onto calendar dates.
pub const SUPPORTED_INTERVALS: [&str; 5] = ["1d", "5d", "1wk", "1mo", "3mo"];

/// Raw OHLCV row from a provider, before normalization.
///
/// Any field may be missing; the adapter decides which rows survive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// True when the row carries no values at all (holidays, halted days).
    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// Structured error types for market-data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data found for symbol: {symbol}")]
    NoData { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("unsupported period '{0}'")]
    UnsupportedPeriod(String),

    #[error("unsupported interval '{0}' (expected one of 1d, 5d, 1wk, 1mo, 3mo)")]
    UnsupportedInterval(String),

    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market-data providers.
///
/// Implementations fetch and normalize; they never compute indicators.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch a normalized series covering `period` at `interval` resolution.
    fn fetch(&self, symbol: &str, period: &str, interval: &str)
        -> Result<PriceSeries, DataError>;

    /// Long company name for `symbol`, when the source knows one.
    fn company_name(&self, _symbol: &str) -> Option<String> {
        None
    }
}

/// Longest explicit period accepted, in days (100 years).
pub const MAX_PERIOD_DAYS: i64 = 100 * 366;

/// Calendar days covered by a Yahoo-style period string (`5d`, `6mo`, `1y`,
/// `ytd`, `max`). `max` maps to `None` (no lower bound). Explicit periods
/// longer than [`MAX_PERIOD_DAYS`] are rejected; use `max` instead.
pub fn period_days(period: &str, today: NaiveDate) -> Result<Option<i64>, DataError> {
    use chrono::Datelike;

    let unsupported = || DataError::UnsupportedPeriod(period.to_string());
    match period {
        "max" => return Ok(None),
        "ytd" => return Ok(Some(i64::from(today.ordinal()))),
        _ => {}
    }

    let split = period
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(unsupported)?;
    let (count, unit) = period.split_at(split);
    let count: i64 = count.parse().map_err(|_| unsupported())?;
    if count == 0 {
        return Err(unsupported());
    }
    let days_per_unit = match unit {
        "d" => 1,
        "wk" => 7,
        "mo" => 31,
        "y" => 366,
        _ => return Err(unsupported()),
    };
    match count.checked_mul(days_per_unit) {
        Some(days) if days <= MAX_PERIOD_DAYS => Ok(Some(days)),
        _ => Err(unsupported()),
    }
}

/// Reject intervals whose bars can't be keyed by date.
pub fn check_interval(interval: &str) -> Result<(), DataError> {
    if SUPPORTED_INTERVALS.contains(&interval) {
        Ok(())
    } else {
        Err(DataError::UnsupportedInterval(interval.to_string()))
    }
}
