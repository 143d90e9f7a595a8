//! Look-ahead contamination tests for the signal indicators.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on truncated series (bars 0..150) and full series (bars 0..300).
//! Assert bars 0..150 are identical between both runs. Any difference means the
//! indicator is leaking future data into past values.

use chrono::NaiveDate;
use stocksignal_core::domain::{PriceBar, PriceSeries};
use stocksignal_core::indicators::*;

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<PriceBar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = price.max(10.0); // floor at 10

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000.0 + (i as f64 * 100.0),
        });
    }

    bars
}

/// Assert that the indicator produces identical values for bars 0..truncated_len
/// whether computed on a truncated or full series.
fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[PriceBar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );
    assert_eq!(
        full_result.len(),
        full_bars.len(),
        "{}: full result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];

        if t.is_nan() && f.is_nan() {
            continue;
        }

        assert!(
            !t.is_nan() && !f.is_nan(),
            "{}: NaN mismatch at bar {i} (truncated={t}, full={f})",
            indicator.name()
        );

        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}, diff={}",
            indicator.name(),
            (t - f).abs()
        );
    }
}

#[test]
fn lookahead_sma() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Sma::new(50), &bars, 150);
    assert_no_lookahead(&Sma::new(200), &bars, 250);
}

#[test]
fn lookahead_ema() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Ema::new(12), &bars, 150);
    assert_no_lookahead(&Ema::new(26), &bars, 150);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Macd::line(12, 26, 9), &bars, 150);
    assert_no_lookahead(&Macd::signal(12, 26, 9), &bars, 150);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Rsi::new(14), &bars, 150);
    assert_no_lookahead(&Rsi::new(7), &bars, 150);
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Bollinger::upper(20, 2.0), &bars, 150);
    assert_no_lookahead(&Bollinger::middle(20, 2.0), &bars, 150);
    assert_no_lookahead(&Bollinger::lower(20, 2.0), &bars, 150);
}

#[test]
fn lookahead_atr() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Atr::new(14), &bars, 150);
    assert_no_lookahead(&Atr::new(5), &bars, 150);
}

#[test]
fn lookahead_support_resistance() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Donchian::support(20), &bars, 150);
    assert_no_lookahead(&Donchian::resistance(20), &bars, 150);
}

#[test]
fn lookahead_volume_average() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&VolumeSma::new(20), &bars, 150);
}

/// The set reads the last bar of whatever series it is given.
#[test]
fn indicator_set_uses_only_the_past() {
    let bars = make_test_bars(300);
    let params = IndicatorParams::default();

    let prefix = PriceSeries::new("TEST", bars[..260].to_vec()).unwrap();
    let again = PriceSeries::new("TEST", bars[..260].to_vec()).unwrap();
    let last_close = bars[299].close;
    let full = PriceSeries::new("TEST", bars).unwrap();

    let a = IndicatorSet::compute(&prefix, &params);
    let b = IndicatorSet::compute(&again, &params);
    assert_eq!(a, b);

    let c = IndicatorSet::compute(&full, &params);
    assert_eq!(a.last_close, Some(prefix.last().close));
    assert_eq!(c.last_close, Some(last_close));
}
