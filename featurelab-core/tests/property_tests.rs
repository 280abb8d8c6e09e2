//! Property tests for feature-table invariants.
//!
//! Uses proptest to verify, over arbitrary sane bar histories:
//! 1. Shape: every column has one value per input row
//! 2. OBV recurrence: OBV_t = OBV_{t-1} + sign(ΔClose)·Volume_t
//! 3. Bounded oscillators: RSI and the stochastic oscillator stay in [0, 100],
//!    Williams %R in [-100, 0]
//! 4. Flag conjunction: the spike flag is exactly High_Volume AND Significant_Price_Move
//! 5. Rolling windows: sample σ is non-negative and mean lies inside the window range

use chrono::NaiveDate;
use featurelab_core::domain::{Bar, OhlcvTable};
use featurelab_core::features::{build_feature_table, ColumnValues, FeatureTable};
use featurelab_core::indicators::rolling::{rolling_max, rolling_mean, rolling_min, rolling_std};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// (return, high wick, low wick, volume) per day.
fn arb_step() -> impl Strategy<Value = (f64, f64, f64, u64)> {
    (-0.08..0.08_f64, 0.0..0.03_f64, 0.0..0.03_f64, 0..5_000_000u64)
}

fn arb_bars(max_len: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(arb_step(), 1..max_len).prop_map(|steps| {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut close = 100.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (ret, up, down, volume))| {
                let open = close;
                close = ((open * (1.0 + ret) * 100.0).round() / 100.0).max(0.01);
                Bar {
                    date: base + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) * (1.0 + up),
                    low: open.min(close) * (1.0 - down),
                    close,
                    volume,
                }
            })
            .collect()
    })
}

fn floats<'a>(table: &'a FeatureTable, name: &str) -> &'a [f64] {
    table.floats(name).unwrap()
}

fn flags<'a>(table: &'a FeatureTable, name: &str) -> &'a [bool] {
    match table.column(name).map(|c| c.values) {
        Some(ColumnValues::Flag(v)) => v,
        _ => panic!("{name} is not a flag column"),
    }
}

proptest! {
    #[test]
    fn every_column_matches_input_length(bars in arb_bars(260)) {
        let n = bars.len();
        let table = build_feature_table(&OhlcvTable::new("P", bars));
        prop_assert_eq!(table.len(), n);
        for col in table.columns() {
            prop_assert_eq!(col.values.len(), n, "{}", col.name);
        }
    }

    #[test]
    fn obv_recurrence(bars in arb_bars(120)) {
        let table = build_feature_table(&OhlcvTable::new("P", bars.clone()));
        let obv = floats(&table, "OBV");
        prop_assert_eq!(obv[0], 0.0);
        for t in 1..bars.len() {
            let v = bars[t].volume_f64();
            let expected = if bars[t].close > bars[t - 1].close {
                obv[t - 1] + v
            } else if bars[t].close < bars[t - 1].close {
                obv[t - 1] - v
            } else {
                obv[t - 1]
            };
            prop_assert_eq!(obv[t], expected);
        }
    }

    #[test]
    fn oscillators_stay_in_range(bars in arb_bars(120)) {
        let table = build_feature_table(&OhlcvTable::new("P", bars));
        for &v in floats(&table, "RSI").iter().filter(|v| !v.is_nan()) {
            prop_assert!((0.0..=100.0).contains(&v), "RSI {}", v);
        }
        for &v in floats(&table, "Stoch_Osc").iter().filter(|v| !v.is_nan()) {
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&v), "Stoch {}", v);
        }
        for &v in floats(&table, "Williams_R").iter().filter(|v| !v.is_nan()) {
            prop_assert!((-100.0 - 1e-9..=1e-9).contains(&v), "Williams {}", v);
        }
    }

    #[test]
    fn spike_flag_is_conjunction(bars in arb_bars(120)) {
        let table = build_feature_table(&OhlcvTable::new("P", bars));
        let high = flags(&table, "High_Volume");
        let moved = flags(&table, "Significant_Price_Move");
        let spike = flags(&table, "Volume_Spike_With_Price_Move");
        for t in 0..table.len() {
            prop_assert_eq!(spike[t], high[t] && moved[t]);
        }
    }

    #[test]
    fn rolling_stats_are_consistent(
        values in prop::collection::vec(1.0..1000.0_f64, 1..80),
        window in 2..25usize,
    ) {
        let mean = rolling_mean(&values, window);
        let std = rolling_std(&values, window);
        let lo = rolling_min(&values, window);
        let hi = rolling_max(&values, window);
        for i in 0..values.len() {
            if i + 1 < window {
                prop_assert!(mean[i].is_nan() && std[i].is_nan());
                continue;
            }
            prop_assert!(std[i] >= 0.0);
            prop_assert!(mean[i] >= lo[i] - 1e-9 && mean[i] <= hi[i] + 1e-9);
        }
    }
}
