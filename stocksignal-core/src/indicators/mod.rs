//! Indicator engine.
//!
//! Every indicator implements [`Indicator`]: bar history in, a numeric series
//! of the same length out, with `f64::NAN` for the warmup prefix. The
//! [`IndicatorSet`] reads the latest value of each series and converts
//! anything non-finite into `None`, so NaN never leaves this module.
//!
//! Multi-series indicators (MACD, Bollinger, support/resistance) are exposed as
//! separate named instances per line, keeping the single-series trait unchanged.

pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod set;
pub mod sma;
pub mod volume;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use donchian::{Donchian, DonchianBand};
pub use ema::Ema;
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use set::{IndicatorParams, IndicatorSet};
pub use sma::Sma;
pub use volume::VolumeSma;

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on data from bar t+1 or later. Computing on a
/// truncated series must reproduce the prefix of the full-series output.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are NaN before the first valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;

    /// Latest value, `None` when undefined.
    fn latest(&self, bars: &[PriceBar]) -> Option<f64> {
        self.compute(bars).last().copied().and_then(defined)
    }
}

/// Map NaN and infinities to `None`.
pub fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_filters_non_finite() {
        assert_eq!(defined(1.5), Some(1.5));
        assert_eq!(defined(f64::NAN), None);
        assert_eq!(defined(f64::INFINITY), None);
        assert_eq!(defined(f64::NEG_INFINITY), None);
    }

    #[test]
    fn latest_reads_last_value() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        assert_eq!(Sma::new(2).latest(&bars), Some(11.5));
        assert_eq!(Sma::new(5).latest(&bars), None);
    }
}
