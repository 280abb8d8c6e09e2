//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses, seeded with
//! the simple mean of the first `period` consecutive defined changes.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period. The first value is at row `period` (14); the Python `ta`
//! package seeds an exponential average at row 0 and reports from row 13.
//! A missing change after the seed repeats the previous RSI.
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0.

use super::atr::wilder_smooth;
use super::indicator::Indicator;
use super::rolling::diff;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "RSI"
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let changes = diff(&super::closes(bars));
        // f64::max drops NaN, so missing changes are restored explicitly
        let gains: Vec<f64> = changes
            .iter()
            .map(|&ch| if ch.is_nan() { ch } else { ch.max(0.0) })
            .collect();
        let losses: Vec<f64> = changes
            .iter()
            .map(|&ch| if ch.is_nan() { ch } else { (-ch).max(0.0) })
            .collect();

        let avg_gain = wilder_smooth(&gains, self.period);
        let avg_loss = wilder_smooth(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else {
                    compute_rsi(g, l)
                }
            })
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
