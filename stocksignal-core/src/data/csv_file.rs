//! CSV market-data provider.
//!
//! Reads `<dir>/<SYMBOL>.csv` in Yahoo's download layout
//! (`Date,Open,High,Low,Close,Adj Close,Volume`; `Adj Close` optional). Empty
//! or `null` cells are treated as missing. The period is applied relative to
//! the last date in the file so that stored histories stay usable.

use super::adapter::normalize;
use super::provider::{period_days, DataError, MarketDataProvider, RawBar, DEFAULT_INTERVAL};
use crate::domain::PriceSeries;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open", deserialize_with = "cell")]
    open: Option<f64>,
    #[serde(rename = "High", deserialize_with = "cell")]
    high: Option<f64>,
    #[serde(rename = "Low", deserialize_with = "cell")]
    low: Option<f64>,
    #[serde(rename = "Close", deserialize_with = "cell")]
    close: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "cell")]
    volume: Option<f64>,
}

/// Numeric cell; blank and `null` are missing.
fn cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn read_rows(path: &Path) -> Result<Vec<RawBar>, DataError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| DataError::Io(format!("failed to open {}: {e}", path.display())))?;

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(line, row)| {
                let row = row.map_err(|e| {
                    DataError::ResponseFormatChanged(format!(
                        "{} row {}: {e}",
                        path.display(),
                        line + 1
                    ))
                })?;
                Ok(RawBar {
                    date: row.date,
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                    volume: row.volume,
                })
            })
            .collect()
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries, DataError> {
        if interval != DEFAULT_INTERVAL {
            return Err(DataError::UnsupportedInterval(interval.to_string()));
        }

        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let mut rows = Self::read_rows(&path)?;
        if let Some(last) = rows.iter().map(|r| r.date).max() {
            if let Some(days) = period_days(period, last)? {
                let cutoff = last
                    .checked_sub_signed(Duration::days(days - 1))
                    .unwrap_or(NaiveDate::MIN);
                rows.retain(|r| r.date >= cutoff);
            }
        }

        let series = normalize(symbol, rows)?;
        tracing::debug!(symbol, path = %path.display(), bars = series.len(), "loaded CSV");
        Ok(series)
    }
}
