//! IndicatorSet: the latest value of every indicator the analyzer reads.

use super::{
    defined, Atr, Bollinger, Donchian, Indicator, Macd, Rsi, Sma, VolumeSma,
};
use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};

/// Window lengths for the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub short_ma: usize,
    pub long_ma: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger: usize,
    pub bollinger_mult: f64,
    pub atr: usize,
    pub levels: usize,
    pub volume: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            short_ma: 50,
            long_ma: 200,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger: 20,
            bollinger_mult: 2.0,
            atr: 14,
            levels: 20,
            volume: 20,
        }
    }
}

/// Latest indicator values for a series. `None` means undefined.
///
/// Deserializes leniently: absent fields are `None`, so a client may post a
/// partial set and let the analyzer report what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSet {
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub last_close: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume: Option<f64>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub atr: Option<f64>,
    pub todays_volume: Option<f64>,
    pub avg_volume_20: Option<f64>,
}

impl IndicatorSet {
    /// Compute every indicator as of the last bar of `series`.
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        let bars = series.bars();
        let last = series.last();

        Self {
            short_ma: Sma::new(params.short_ma).latest(bars),
            long_ma: Sma::new(params.long_ma).latest(bars),
            rsi: Rsi::new(params.rsi).latest(bars),
            macd: Macd::line(params.macd_fast, params.macd_slow, params.macd_signal).latest(bars),
            macd_signal: Macd::signal(params.macd_fast, params.macd_slow, params.macd_signal)
                .latest(bars),
            upper_band: Bollinger::upper(params.bollinger, params.bollinger_mult).latest(bars),
            lower_band: Bollinger::lower(params.bollinger, params.bollinger_mult).latest(bars),
            last_close: defined(last.close),
            volume: defined(last.volume),
            avg_volume: VolumeSma::new(params.volume).latest(bars),
            support: Donchian::support(params.levels).latest(bars),
            resistance: Donchian::resistance(params.levels).latest(bars),
            atr: Atr::new(params.atr).latest(bars),
            todays_volume: None,
            avg_volume_20: None,
        }
    }

    /// Attach the adapter's convenience volume fields.
    pub fn with_volume_summary(mut self, todays_volume: Option<f64>, avg_volume_20: Option<f64>) -> Self {
        self.todays_volume = todays_volume.and_then(defined);
        self.avg_volume_20 = avg_volume_20.and_then(defined);
        self
    }

    /// Replace any non-finite value with `None`.
    ///
    /// Applied to sets that arrive from outside the engine.
    pub fn sanitized(mut self) -> Self {
        for field in self.fields_mut() {
            *field = field.and_then(defined);
        }
        self
    }

    /// Named view over the values, in declaration order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 15] {
        [
            ("short_ma", self.short_ma),
            ("long_ma", self.long_ma),
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
            ("upper_band", self.upper_band),
            ("lower_band", self.lower_band),
            ("last_close", self.last_close),
            ("volume", self.volume),
            ("avg_volume", self.avg_volume),
            ("support", self.support),
            ("resistance", self.resistance),
            ("atr", self.atr),
            ("todays_volume", self.todays_volume),
            ("avg_volume_20", self.avg_volume_20),
        ]
    }

    /// Look up a value by field name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value)
    }

    fn fields_mut(&mut self) -> [&mut Option<f64>; 15] {
        [
            &mut self.short_ma,
            &mut self.long_ma,
            &mut self.rsi,
            &mut self.macd,
            &mut self.macd_signal,
            &mut self.upper_band,
            &mut self.lower_band,
            &mut self.last_close,
            &mut self.volume,
            &mut self.avg_volume,
            &mut self.support,
            &mut self.resistance,
            &mut self.atr,
            &mut self.todays_volume,
            &mut self.avg_volume_20,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new("TEST", make_bars(closes)).unwrap()
    }

    #[test]
    fn short_history_leaves_windows_undefined() {
        let set = IndicatorSet::compute(&series(&[100.0; 10]), &IndicatorParams::default());
        assert_eq!(set.short_ma, None);
        assert_eq!(set.long_ma, None);
        assert_eq!(set.rsi, None);
        assert_eq!(set.upper_band, None);
        assert_eq!(set.support, None);
        assert_eq!(set.atr, None);
        assert_eq!(set.avg_volume, None);
        // MACD and the raw bar values are always defined
        assert!(set.macd.is_some());
        assert!(set.macd_signal.is_some());
        assert_eq!(set.last_close, Some(100.0));
        assert_eq!(set.volume, Some(1000.0));
    }

    #[test]
    fn full_history_defines_everything_computed() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0).collect();
        let set = IndicatorSet::compute(&series(&closes), &IndicatorParams::default());
        for (name, value) in set.entries().iter().take(13) {
            assert!(value.is_some(), "{name} should be defined");
        }
        let expected_long = closes[50..].iter().sum::<f64>() / 200.0;
        assert_approx(set.long_ma.unwrap(), expected_long, 1e-9);
    }

    #[test]
    fn serializes_undefined_as_null() {
        let set = IndicatorSet {
            rsi: Some(55.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["rsi"], 55.0);
        assert!(json["long_ma"].is_null());
        assert!(json["avg_volume_20"].is_null());
    }

    #[test]
    fn deserializes_partial_sets() {
        let set: IndicatorSet = serde_json::from_str(r#"{"rsi": 25.0, "macd": null}"#).unwrap();
        assert_eq!(set.rsi, Some(25.0));
        assert_eq!(set.macd, None);
        assert_eq!(set.short_ma, None);
    }

    #[test]
    fn sanitized_drops_non_finite() {
        let set = IndicatorSet {
            rsi: Some(f64::INFINITY),
            atr: Some(f64::NAN),
            macd: Some(1.0),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(set.rsi, None);
        assert_eq!(set.atr, None);
        assert_eq!(set.macd, Some(1.0));
    }

    #[test]
    fn get_by_name() {
        let set = IndicatorSet {
            support: Some(95.0),
            ..Default::default()
        };
        assert_eq!(set.get("support"), Some(95.0));
        assert_eq!(set.get("resistance"), None);
        assert_eq!(set.get("unknown"), None);
    }
}
