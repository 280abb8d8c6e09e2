//! Trailing-window and shift operations on plain `f64` series.
//!
//! Every function returns a series of the input's length. A window that has
//! not filled yet, or that contains a NaN, yields NaN at that row. Nothing
//! here reads past the current row.

/// Apply `f` to each full trailing window of `period` values.
fn rolling_apply(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = f(window);
    }

    result
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom.
fn std_dev(window: &[f64], ddof: usize) -> f64 {
    let n = window.len();
    if n <= ddof {
        return f64::NAN;
    }
    let m = mean(window);
    let ss: f64 = window.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - ddof) as f64).sqrt()
}

pub fn rolling_sum(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |w| w.iter().sum())
}

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, mean)
}

/// Sample standard deviation (ddof = 1).
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |w| std_dev(w, 1))
}

/// Population standard deviation (ddof = 0).
pub fn rolling_population_std(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |w| std_dev(w, 0))
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Value `lag` rows earlier; the first `lag` rows are NaN.
pub fn shift(values: &[f64], lag: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if lag < n {
        result[lag..].copy_from_slice(&values[..n - lag]);
    }
    result
}

/// First difference: `x[t] - x[t-1]`, NaN at row 0.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        result[i] = values[i] - values[i - 1];
    }
    result
}

/// Fractional change: `x[t] / x[t-1] - 1`, NaN at row 0.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        result[i] = (values[i] - values[i - 1]) / values[i - 1];
    }
    result
}

/// Running sum from row 0. A NaN row is NaN itself and is left out of the sum.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            if v.is_nan() {
                return Some(f64::NAN);
            }
            *acc += v;
            Some(*acc)
        })
        .collect()
}
