//! Fixed window sizes of the feature catalogue.
//!
//! These are not configurable: downstream models are trained against this
//! exact column set.

/// Period shared by ADX, RSI, the stochastic oscillator, Williams %R and ATR.
pub const OSCILLATOR_PERIOD: usize = 14;

pub const MACD_FAST_SPAN: usize = 63;
pub const MACD_SLOW_SPAN: usize = 126;

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_MULTIPLIER: f64 = 2.0;

pub const CMF_PERIOD: usize = 20;

/// Row offsets for `Close_Lag_k` / `Volume_Lag_k`.
pub const LAGS: [usize; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Windows for the `*_Roll_Mean_w` / `*_Roll_Std_w` columns.
pub const ROLLING_WINDOWS: [usize; 3] = [5, 10, 20];

/// Window behind `Relative_Volume` and both anomaly flags.
pub const ANOMALY_WINDOW: usize = 20;

/// Deviation threshold (in standard deviations) for the anomaly flags.
pub const ANOMALY_SIGMAS: f64 = 2.0;
