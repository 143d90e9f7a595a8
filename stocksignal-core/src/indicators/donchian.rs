//! Donchian channel: rolling support and resistance levels.
//!
//! Two series (exposed as separate Indicator instances):
//! - Resistance: max(high[t-period+1..=t])
//! - Support: min(low[t-period+1..=t])
//!
//! The window includes the current bar. Lookback: period - 1.

use super::Indicator;
use crate::domain::PriceBar;

/// Which edge of the channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonchianBand {
    Resistance,
    Support,
}

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    band: DonchianBand,
    name: String,
}

impl Donchian {
    pub fn resistance(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Resistance,
            name: format!("resistance_{period}"),
        }
    }

    pub fn support(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Support,
            name: format!("support_{period}"),
        }
    }
}

impl Indicator for Donchian {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[(i + 1 - self.period)..=i];
            let values = window.iter().map(|bar| match self.band {
                DonchianBand::Resistance => bar.high,
                DonchianBand::Support => bar.low,
            });

            let mut extreme = match self.band {
                DonchianBand::Resistance => f64::NEG_INFINITY,
                DonchianBand::Support => f64::INFINITY,
            };
            let mut has_nan = false;
            for v in values {
                if v.is_nan() {
                    has_nan = true;
                    break;
                }
                extreme = match self.band {
                    DonchianBand::Resistance => extreme.max(v),
                    DonchianBand::Support => extreme.min(v),
                };
            }
            if !has_nan {
                result[i] = extreme;
            }
        }

        result
    }
}
