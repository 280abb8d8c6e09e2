//! On-Balance Volume (OBV).
//!
//! OBV[0] = 0. Each later bar adds its volume on an up-close, subtracts it
//! on a down-close and carries the previous value on an unchanged close.
//! Lookback: 0.

use super::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        "OBV"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut result = Vec::with_capacity(bars.len());
        let mut obv = 0.0;

        for (i, bar) in bars.iter().enumerate() {
            if i > 0 {
                let prev = bars[i - 1].close;
                if bar.close > prev {
                    obv += bar.volume_f64();
                } else if bar.close < prev {
                    obv -= bar.volume_f64();
                }
            }
            result.push(obv);
        }

        result
    }
}
