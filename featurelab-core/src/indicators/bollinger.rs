//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances), all literal price levels:
//! - Middle (`BBmid`): SMA(close, period)
//! - Upper (`BBupp`): middle + mult * stddev(close, period)
//! - Lower (`BBlow`): middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::indicator::Indicator;
use super::rolling::{rolling_mean, rolling_population_std};
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
}

impl Bollinger {
    fn with_band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        match self.band {
            BollingerBand::Upper => "BBupp",
            BollingerBand::Middle => "BBmid",
            BollingerBand::Lower => "BBlow",
        }
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = super::closes(bars);
        let mean = rolling_mean(&closes, self.period);
        if self.band == BollingerBand::Middle {
            return mean;
        }

        let sign = match self.band {
            BollingerBand::Upper => 1.0,
            _ => -1.0,
        };
        let stddev = rolling_population_std(&closes, self.period);
        mean.iter()
            .zip(&stddev)
            .map(|(m, s)| m + sign * self.multiplier * s)
            .collect()
    }
}
