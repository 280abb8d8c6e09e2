//! Derived-feature stage: lags, rolling statistics, calendar fields, VWAP and
//! anomaly flags. Every column is causal.

use super::params::{ANOMALY_SIGMAS, ANOMALY_WINDOW, LAGS, ROLLING_WINDOWS};
use crate::domain::OhlcvTable;
use crate::indicators::rolling::{cumulative_sum, diff, pct_change, rolling_mean, rolling_std, shift};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// `Close_Lag_k` and `Volume_Lag_k` for one lag.
#[derive(Debug, Clone)]
pub struct LagColumns {
    pub lag: usize,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

/// Rolling mean and sample standard deviation of close and volume for one window.
#[derive(Debug, Clone)]
pub struct RollingColumns {
    pub window: usize,
    pub close_mean: Vec<f64>,
    pub close_std: Vec<f64>,
    pub volume_mean: Vec<f64>,
    pub volume_std: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct DerivedColumns {
    pub price_change: Vec<f64>,
    pub pct_change: Vec<f64>,
    pub lags: Vec<LagColumns>,
    pub rolling: Vec<RollingColumns>,
    pub relative_volume: Vec<f64>,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: Vec<u32>,
    pub is_month_end: Vec<bool>,
    pub vwap: Vec<f64>,
    pub high_volume: Vec<bool>,
    pub significant_price_move: Vec<bool>,
    pub volume_spike_with_price_move: Vec<bool>,
}

/// True when `date` is the last calendar day of its month.
pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// `|x - mean| > k * std` (or `x > mean + k * std` when one-sided).
/// NaN operands compare false.
fn deviation_flags(values: &[f64], window: usize, two_sided: bool) -> Vec<bool> {
    let mean = rolling_mean(values, window);
    let std = rolling_std(values, window);
    values
        .iter()
        .zip(mean.iter().zip(&std))
        .map(|(&x, (&m, &s))| {
            let threshold = ANOMALY_SIGMAS * s;
            if two_sided {
                (x - m).abs() > threshold
            } else {
                x > m + threshold
            }
        })
        .collect()
}

/// Rows with a missing close are NaN and contribute neither price nor volume.
fn vwap(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let turnover: Vec<f64> = closes.iter().zip(volumes).map(|(c, v)| c * v).collect();
    let traded: Vec<f64> = closes
        .iter()
        .zip(volumes)
        .map(|(c, &v)| if c.is_nan() { f64::NAN } else { v })
        .collect();
    cumulative_sum(&turnover)
        .into_iter()
        .zip(cumulative_sum(&traded))
        .map(|(pv, v)| pv / v)
        .collect()
}

/// Compute every derived column for the table.
pub fn derived_stage(table: &OhlcvTable) -> DerivedColumns {
    let closes = table.closes();
    let volumes = table.volumes();
    let dates = table.dates();

    let price_change = diff(&closes);
    let pct = pct_change(&closes);

    let lags = LAGS
        .iter()
        .map(|&lag| LagColumns {
            lag,
            close: shift(&closes, lag),
            volume: shift(&volumes, lag),
        })
        .collect();

    let rolling = ROLLING_WINDOWS
        .iter()
        .map(|&window| RollingColumns {
            window,
            close_mean: rolling_mean(&closes, window),
            close_std: rolling_std(&closes, window),
            volume_mean: rolling_mean(&volumes, window),
            volume_std: rolling_std(&volumes, window),
        })
        .collect();

    let relative_volume = volumes
        .iter()
        .zip(rolling_mean(&volumes, ANOMALY_WINDOW))
        .map(|(v, m)| v / m)
        .collect();

    let high_volume = deviation_flags(&volumes, ANOMALY_WINDOW, false);
    let significant_price_move = deviation_flags(&pct, ANOMALY_WINDOW, true);
    let volume_spike_with_price_move = high_volume
        .iter()
        .zip(&significant_price_move)
        .map(|(&h, &s)| h && s)
        .collect();

    debug!(rows = closes.len(), "derived stage complete");

    DerivedColumns {
        price_change,
        pct_change: pct,
        lags,
        rolling,
        relative_volume,
        day_of_week: dates.iter().map(|d| d.weekday().num_days_from_monday()).collect(),
        is_month_end: dates.iter().map(|&d| is_month_end(d)).collect(),
        vwap: vwap(&closes, &volumes),
        high_volume,
        significant_price_move,
        volume_spike_with_price_move,
    }
}
