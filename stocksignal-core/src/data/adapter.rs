//! Normalization from raw provider rows to a validated PriceSeries.
//!
//! Rules, applied in order:
//! 1. Rows with no values at all are skipped (holidays).
//! 2. Rows missing any of open/high/low/close are dropped; a missing volume
//!    becomes 0.
//! 3. Rows that fail the OHLC sanity check are dropped with a warning.
//! 4. Rows are sorted by date; on duplicate dates the later row wins (Yahoo
//!    repeats the live bar at the end of a range).
//! 5. An empty result is `DataError::NoData`.

use super::provider::{DataError, RawBar};
use crate::domain::{PriceBar, PriceSeries};
use crate::indicators::{Indicator, VolumeSma};
use serde::Serialize;

pub fn normalize(symbol: &str, raw: Vec<RawBar>) -> Result<PriceSeries, DataError> {
    let total = raw.len();
    let mut bars: Vec<PriceBar> = Vec::with_capacity(total);
    let mut dropped = 0usize;

    for row in raw {
        if row.is_empty() {
            continue;
        }
        let (Some(open), Some(high), Some(low), Some(close)) =
            (row.open, row.high, row.low, row.close)
        else {
            dropped += 1;
            continue;
        };
        let bar = PriceBar {
            date: row.date,
            open,
            high,
            low,
            close,
            volume: row.volume.unwrap_or(0.0),
        };
        if !bar.is_sane() {
            tracing::warn!(symbol, date = %bar.date, "dropping bar with inconsistent OHLC values");
            dropped += 1;
            continue;
        }
        bars.push(bar);
    }

    // Stable sort keeps provider order within a date, so dedup keeps the last
    bars.sort_by_key(|b| b.date);
    bars.reverse();
    bars.dedup_by_key(|b| b.date);
    bars.reverse();

    if dropped > 0 {
        tracing::debug!(symbol, dropped, total, "dropped incomplete rows");
    }

    if bars.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }

    Ok(PriceSeries::new(symbol, bars)?)
}

/// Convenience volume fields reported alongside the indicator set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolumeSummary {
    pub todays_volume: Option<f64>,
    pub avg_volume_20: Option<f64>,
}

impl VolumeSummary {
    pub fn from_series(series: &PriceSeries) -> Self {
        let todays_volume = Some(series.last().volume).filter(|v| v.is_finite());
        Self {
            todays_volume,
            avg_volume_20: VolumeSma::new(20).latest(series.bars()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn row(day: u32, close: f64) -> RawBar {
        RawBar {
            date: date(day),
            open: Some(close),
            high: Some(close + 1.0),
            low: Some(close - 1.0),
            close: Some(close),
            volume: Some(1000.0),
        }
    }

    #[test]
    fn skips_empty_and_incomplete_rows() {
        let holiday = RawBar {
            date: date(3),
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        };
        let no_close = RawBar {
            close: None,
            ..row(4, 12.0)
        };
        let no_volume = RawBar {
            volume: None,
            ..row(5, 13.0)
        };
        let series =
            normalize("AAA", vec![row(2, 10.0), holiday, no_close, no_volume]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().close, 13.0);
        assert_eq!(series.last().volume, 0.0);
    }

    #[test]
    fn sorts_and_keeps_last_duplicate() {
        let series = normalize(
            "AAA",
            vec![row(3, 12.0), row(1, 10.0), row(3, 12.5), row(2, 11.0)],
        )
        .unwrap();
        let closes = series.closes();
        assert_eq!(closes, vec![10.0, 11.0, 12.5]);
    }

    #[test]
    fn drops_insane_bars() {
        let inverted = RawBar {
            high: Some(5.0),
            ..row(2, 10.0)
        };
        let series = normalize("AAA", vec![row(1, 10.0), inverted]).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn nothing_left_is_no_data() {
        let err = normalize("ZZZ", vec![]).unwrap_err();
        assert!(matches!(err, DataError::NoData { ref symbol } if symbol == "ZZZ"));
        assert_eq!(err.to_string(), "no data found for symbol: ZZZ");
    }

    #[test]
    fn volume_summary_needs_twenty_bars() {
        let short = normalize("AAA", (1..=5).map(|d| row(d, 10.0)).collect()).unwrap();
        let summary = VolumeSummary::from_series(&short);
        assert_eq!(summary.todays_volume, Some(1000.0));
        assert_eq!(summary.avg_volume_20, None);

        let full = normalize("AAA", (1..=25).map(|d| row(d, 10.0)).collect()).unwrap();
        assert_eq!(VolumeSummary::from_series(&full).avg_volume_20, Some(1000.0));
    }
}
