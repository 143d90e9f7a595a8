//! Deterministic synthetic market data.
//!
//! A random walk seeded from a BLAKE3 hash of the symbol, so the same symbol
//! always yields the same bars. Used for offline runs and tests.

use super::adapter::normalize;
use super::provider::{period_days, DataError, MarketDataProvider, RawBar, DEFAULT_INTERVAL};
use crate::domain::PriceSeries;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Days generated for `period = "max"`.
const MAX_HISTORY_DAYS: i64 = 10 * 366;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    end: NaiveDate,
}

impl SyntheticProvider {
    /// Bars end on `end` (inclusive).
    pub fn new(end: NaiveDate) -> Self {
        Self { end }
    }

    fn rng_for(symbol: &str) -> StdRng {
        StdRng::from_seed(*blake3::hash(symbol.as_bytes()).as_bytes())
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(chrono::Utc::now().date_naive())
    }
}

/// Weekday random walk over `[start, end]`, starting at 100.
pub fn generate_bars(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(RawBar {
            date: current,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        });

        price = close;
        current += Duration::days(1);
    }

    bars
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, period: &str, interval: &str) -> Result<PriceSeries, DataError> {
        // Daily only
        if interval != DEFAULT_INTERVAL {
            return Err(DataError::UnsupportedInterval(interval.to_string()));
        }
        let days = period_days(period, self.end)?.unwrap_or(MAX_HISTORY_DAYS);
        let start = self
            .end
            .checked_sub_signed(Duration::days(days - 1))
            .ok_or_else(|| DataError::UnsupportedPeriod(period.to_string()))?;

        let mut rng = Self::rng_for(symbol);
        let bars = generate_bars(&mut rng, start, self.end);
        normalize(symbol, bars)
    }

    fn company_name(&self, symbol: &str) -> Option<String> {
        Some(format!("{symbol} Synthetic Corp."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SyntheticProvider {
        // A Friday
        SyntheticProvider::new(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap())
    }

    #[test]
    fn same_symbol_same_bars() {
        let a = provider().fetch("SPY", "1y", "1d").unwrap();
        let b = provider().fetch("SPY", "1y", "1d").unwrap();
        assert_eq!(a.bars(), b.bars());
    }

    #[test]
    fn different_symbols_differ() {
        let a = provider().fetch("SPY", "3mo", "1d").unwrap();
        let b = provider().fetch("QQQ", "3mo", "1d").unwrap();
        assert_ne!(a.closes(), b.closes());
    }

    #[test]
    fn one_year_covers_long_moving_average() {
        let series = provider().fetch("SPY", "1y", "1d").unwrap();
        // 366 calendar days hold ~261 weekdays
        assert!(series.len() > 250, "got {}", series.len());
        assert_eq!(series.last().date, NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        assert!(series
            .bars()
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn only_daily_bars() {
        assert!(matches!(
            provider().fetch("SPY", "1y", "1wk"),
            Err(DataError::UnsupportedInterval(_))
        ));
        assert!(matches!(
            provider().fetch("SPY", "1y", "15m"),
            Err(DataError::UnsupportedInterval(_))
        ));
    }

    #[test]
    fn century_period_is_the_longest_accepted() {
        let series = provider().fetch("SPY", "100y", "1d").unwrap();
        assert!(series.len() > 25_000);
        assert!(matches!(
            provider().fetch("SPY", "1000000y", "1d"),
            Err(DataError::UnsupportedPeriod(_))
        ));
    }

    #[test]
    fn knows_a_company_name() {
        assert_eq!(
            provider().company_name("ABC").as_deref(),
            Some("ABC Synthetic Corp.")
        );
    }
}
