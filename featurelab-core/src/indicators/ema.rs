//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2/(span+1).
//! Seed: EMA[0] = close[0], so the series is defined from the first bar.
//! A missing close repeats the previous EMA and leaves the state untouched.
//! Lookback: 0.

use super::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("EMA_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&super::closes(bars), self.span)
    }
}

/// Compute a first-value-seeded EMA over an arbitrary series.
///
/// The seed is the first non-NaN value; rows before it are NaN. After the
/// seed, a NaN input repeats the previous average.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];

    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut state: Option<f64> = None;

    for (out, &v) in result.iter_mut().zip(values) {
        state = match state {
            _ if v.is_nan() => state,
            None => Some(v),
            Some(prev) => Some(alpha * v + (1.0 - alpha) * prev),
        };
        *out = state.unwrap_or(f64::NAN);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_span_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5, seed = first close
        // EMA = 10, 10.5, 11.25, 12.125
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = Ema::new(3).compute(&bars);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_defined_from_first_row() {
        let bars = make_bars(&[50.0; 10]);
        let result = Ema::new(200).compute(&bars);
        assert!(result.iter().all(|v| (*v - 50.0).abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn ema_carries_over_missing_close() {
        // alpha = 0.5: 10, 10.5, (hold) 10.5, 11.75, 12.875
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        bars[2].close = f64::NAN;
        let result = Ema::new(3).compute(&bars);
        assert_approx(result[2], 10.5, DEFAULT_EPSILON);
        assert_approx(result[3], 11.75, DEFAULT_EPSILON);
        assert_approx(result[4], 12.875, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_seeds_on_first_defined_value() {
        let result = ema_of_series(&[f64::NAN, f64::NAN, 4.0, 6.0], 3);
        assert!(result[0].is_nan() && result[1].is_nan());
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
        assert_approx(result[3], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_name_and_lookback() {
        let ema = Ema::new(63);
        assert_eq!(ema.name(), "EMA_63");
        assert_eq!(ema.lookback(), 0);
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(Ema::new(4).compute(&bars), ema_of_series(&closes, 4));
    }

    #[test]
    fn empty_input() {
        assert!(ema_of_series(&[], 5).is_empty());
    }
}
