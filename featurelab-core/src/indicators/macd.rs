//! MACD line: EMA(close, fast) - EMA(close, slow).
//!
//! Both legs are first-value-seeded EMAs, so MACD[0] = 0 and the series has
//! no warmup. The feature table uses the 63/126 spans, not the usual 12/26.

use super::ema::ema_of_series;
use super::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1 && slow >= 1, "MACD spans must be >= 1");
        Self { fast, slow }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "MACD"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = super::closes(bars);
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}
