//! Chaikin Money Flow (CMF).
//!
//! Money Flow Multiplier: ((close - low) - (high - close)) / (high - low),
//! taken as 0 when high == low.
//! CMF = sum(MFM * volume, period) / sum(volume, period).
//! Lookback: period - 1.

use super::indicator::Indicator;
use super::rolling::rolling_sum;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Cmf {
    period: usize,
}

impl Cmf {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CMF period must be >= 1");
        Self { period }
    }
}

fn money_flow_multiplier(bar: &Bar) -> f64 {
    let range = bar.high - bar.low;
    if range == 0.0 {
        return 0.0;
    }
    ((bar.close - bar.low) - (bar.high - bar.close)) / range
}

impl Indicator for Cmf {
    fn name(&self) -> &str {
        "CMF"
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let flow_volume: Vec<f64> = bars
            .iter()
            .map(|b| money_flow_multiplier(b) * b.volume_f64())
            .collect();
        let volume: Vec<f64> = bars.iter().map(Bar::volume_f64).collect();

        let flow_sum = rolling_sum(&flow_volume, self.period);
        let volume_sum = rolling_sum(&volume, self.period);
        flow_sum.iter().zip(&volume_sum).map(|(f, v)| f / v).collect()
    }
}
