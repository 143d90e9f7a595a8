//! Volume average: simple rolling mean of bar volume.

use super::sma::sma_of_series;
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        sma_of_series(&volumes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn volume_sma_averages_volume() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[0].volume = 100.0;
        bars[1].volume = 200.0;
        bars[2].volume = 600.0;
        let result = VolumeSma::new(3).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }
}
