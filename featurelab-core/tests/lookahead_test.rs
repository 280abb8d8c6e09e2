//! Look-ahead contamination tests.
//!
//! Invariant: no feature value at row t may depend on bars t+1 or later.
//!
//! Method: compute on a truncated series (rows 0..n) and on the full series.
//! Rows 0..n must be identical between both runs. Any difference means a
//! column is leaking future data into past values.

use chrono::NaiveDate;
use featurelab_core::domain::{Bar, OhlcvTable};
use featurelab_core::features::{build_feature_table, ColumnValues};
use featurelab_core::indicators::*;

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price += change;
        price = price.max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000 + (seed % 5000),
        });
    }

    bars
}

fn assert_same(label: &str, i: usize, t: f64, f: f64) {
    if t.is_nan() && f.is_nan() {
        return;
    }
    assert!(
        !t.is_nan() && !f.is_nan(),
        "{label}: NaN mismatch at row {i} (truncated={t}, full={f})"
    );
    assert!(
        (t - f).abs() <= 1e-10 * f.abs().max(1.0),
        "{label}: look-ahead contamination at row {i}: truncated={t}, full={f}"
    );
}

/// Assert that the indicator produces identical values for rows 0..truncated_len
/// whether computed on a truncated or full series.
fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let truncated_result = indicator.compute(&full_bars[..truncated_len]);
    let full_result = indicator.compute(full_bars);

    assert_eq!(truncated_result.len(), truncated_len, "{}", indicator.name());
    assert_eq!(full_result.len(), full_bars.len(), "{}", indicator.name());

    for i in 0..truncated_len {
        assert_same(&indicator.name(), i, truncated_result[i], full_result[i]);
    }
}

#[test]
fn lookahead_trend_indicators() {
    let bars = make_test_bars(300);
    assert_no_lookahead(&Sma::new(20), &bars, 150);
    assert_no_lookahead(&Sma::new(100), &bars, 150);
    assert_no_lookahead(&Ema::new(20), &bars, 150);
    assert_no_lookahead(&Ema::new(200), &bars, 150);
    assert_no_lookahead(&Macd::new(63, 126), &bars, 150);
    assert_no_lookahead(&Adx::new(14), &bars, 150);
}

#[test]
fn lookahead_momentum_indicators() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&StochasticOscillator::new(14), &bars, 100);
    assert_no_lookahead(&WilliamsR::new(14), &bars, 100);
}

#[test]
fn lookahead_volatility_indicators() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Bollinger::upper(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::middle(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::lower(20, 2.0), &bars, 100);
    assert_no_lookahead(&Atr::new(14), &bars, 100);
}

#[test]
fn lookahead_volume_indicators() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Obv::new(), &bars, 100);
    assert_no_lookahead(&Cmf::new(20), &bars, 100);
}

/// Every column of the assembled table, including derived features.
#[test]
fn lookahead_feature_table() {
    let full_input = OhlcvTable::new("TEST", make_test_bars(260));
    let full = build_feature_table(&full_input);

    for truncated_len in [1, 30, 130, 259] {
        let truncated = build_feature_table(&full_input.prefix(truncated_len));
        assert_eq!(truncated.len(), truncated_len);

        for (t_col, f_col) in truncated.columns().iter().zip(full.columns().iter()) {
            assert_eq!(t_col.name, f_col.name);
            match (t_col.values, f_col.values) {
                (ColumnValues::Float(t), ColumnValues::Float(f)) => {
                    for i in 0..truncated_len {
                        assert_same(&t_col.name, i, t[i], f[i]);
                    }
                }
                (ColumnValues::Date(t), ColumnValues::Date(f)) => {
                    assert_eq!(t, &f[..truncated_len]);
                }
                (ColumnValues::Int(t), ColumnValues::Int(f)) => {
                    assert_eq!(t, &f[..truncated_len], "{}", t_col.name);
                }
                (ColumnValues::Flag(t), ColumnValues::Flag(f)) => {
                    assert_eq!(t, &f[..truncated_len], "{}", t_col.name);
                }
                _ => panic!("{}: column type changed", t_col.name),
            }
        }
    }
}
