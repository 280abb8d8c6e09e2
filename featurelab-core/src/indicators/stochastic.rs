//! Stochastic %K and Williams %R.
//!
//! Both compare the close with the highest high (HH) and lowest low (LL) of
//! the trailing `period` bars, current bar included:
//! - %K = 100 * (close - LL) / (HH - LL)
//! - %R = -100 * (HH - close) / (HH - LL)
//!
//! A flat window (HH == LL) has no defined position and yields NaN.
//! Lookback: period - 1.

use super::indicator::Indicator;
use super::rolling::{rolling_max, rolling_min};
use crate::domain::Bar;

/// Highest high and lowest low over each trailing window.
fn channel(bars: &[Bar], period: usize) -> (Vec<f64>, Vec<f64>) {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    (rolling_max(&highs, period), rolling_min(&lows, period))
}

fn range_position(bars: &[Bar], period: usize, f: impl Fn(f64, f64, f64) -> f64) -> Vec<f64> {
    let (hh, ll) = channel(bars, period);
    bars.iter()
        .zip(hh.iter().zip(&ll))
        .map(|(bar, (&hh, &ll))| {
            let range = hh - ll;
            if range.is_nan() || range == 0.0 {
                f64::NAN
            } else {
                f(bar.close, hh, ll) / range
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct StochasticOscillator {
    period: usize,
}

impl StochasticOscillator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        Self { period }
    }
}

impl Indicator for StochasticOscillator {
    fn name(&self) -> &str {
        "Stoch_Osc"
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        range_position(bars, self.period, |close, _hh, ll| 100.0 * (close - ll))
    }
}

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Williams %R period must be >= 1");
        Self { period }
    }
}

impl Indicator for WilliamsR {
    fn name(&self) -> &str {
        "Williams_R"
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        range_position(bars, self.period, |close, hh, _ll| -100.0 * (hh - close))
    }
}
