//! The assembled, immutable feature table and its ordered column catalogue.

use super::derived_stage::DerivedColumns;
use super::indicator_stage::IndicatorColumns;
use crate::domain::OhlcvTable;
use crate::fingerprint::{self, FeatureHash};
use chrono::NaiveDate;

/// Borrowed view of one column's values.
#[derive(Debug, Clone, Copy)]
pub enum ColumnValues<'a> {
    Date(&'a [NaiveDate]),
    Float(&'a [f64]),
    Int(&'a [u32]),
    Flag(&'a [bool]),
}

impl ColumnValues<'_> {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Date(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Flag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column in catalogue order.
#[derive(Debug, Clone)]
pub struct FeatureColumn<'a> {
    pub name: String,
    pub values: ColumnValues<'a>,
}

impl<'a> FeatureColumn<'a> {
    fn new(name: impl Into<String>, values: ColumnValues<'a>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    fn float(name: impl Into<String>, values: &'a [f64]) -> Self {
        Self::new(name, ColumnValues::Float(values))
    }

    fn flag(name: impl Into<String>, values: &'a [bool]) -> Self {
        Self::new(name, ColumnValues::Flag(values))
    }

    pub fn as_floats(&self) -> Option<&'a [f64]> {
        match self.values {
            ColumnValues::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// OHLCV input plus every computed feature, one row per trading date.
///
/// Built once by [`super::build_feature_table`] and never mutated.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    symbol: String,
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
    indicators: IndicatorColumns,
    derived: DerivedColumns,
}

impl FeatureTable {
    pub(crate) fn assemble(
        input: &OhlcvTable,
        indicators: IndicatorColumns,
        derived: DerivedColumns,
    ) -> Self {
        Self {
            symbol: input.symbol().to_string(),
            dates: input.dates(),
            open: input.opens(),
            high: input.highs(),
            low: input.lows(),
            close: input.closes(),
            volume: input.volumes(),
            indicators,
            derived,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn indicators(&self) -> &IndicatorColumns {
        &self.indicators
    }

    pub fn derived(&self) -> &DerivedColumns {
        &self.derived
    }

    /// Every column in export order: OHLCV, indicators, then derived features.
    pub fn columns(&self) -> Vec<FeatureColumn<'_>> {
        let trend = &self.indicators.trend;
        let momentum = &self.indicators.momentum;
        let volatility = &self.indicators.volatility;
        let volume = &self.indicators.volume;
        let d = &self.derived;

        let mut cols = vec![
            FeatureColumn::new("Date", ColumnValues::Date(&self.dates)),
            FeatureColumn::float("Open", &self.open),
            FeatureColumn::float("High", &self.high),
            FeatureColumn::float("Low", &self.low),
            FeatureColumn::float("Close", &self.close),
            FeatureColumn::float("Volume", &self.volume),
            FeatureColumn::float("SMA_20", &trend.sma_20),
            FeatureColumn::float("SMA_50", &trend.sma_50),
            FeatureColumn::float("SMA_100", &trend.sma_100),
            FeatureColumn::float("SMA_200", &trend.sma_200),
            FeatureColumn::float("EMA_20", &trend.ema_20),
            FeatureColumn::float("EMA_50", &trend.ema_50),
            FeatureColumn::float("EMA_63", &trend.ema_63),
            FeatureColumn::float("EMA_100", &trend.ema_100),
            FeatureColumn::float("EMA_200", &trend.ema_200),
            FeatureColumn::float("MACD", &trend.macd),
            FeatureColumn::float("ADX", &trend.adx),
            FeatureColumn::float("RSI", &momentum.rsi),
            FeatureColumn::float("Stoch_Osc", &momentum.stoch_osc),
            FeatureColumn::float("Williams_R", &momentum.williams_r),
            FeatureColumn::float("BBlow", &volatility.bb_low),
            FeatureColumn::float("BBmid", &volatility.bb_mid),
            FeatureColumn::float("BBupp", &volatility.bb_upp),
            FeatureColumn::float("ATR", &volatility.atr),
            FeatureColumn::float("OBV", &volume.obv),
            FeatureColumn::float("CMF", &volume.cmf),
            FeatureColumn::float("Price_Change", &d.price_change),
            FeatureColumn::float("Pct_Change", &d.pct_change),
        ];

        for lag in &d.lags {
            cols.push(FeatureColumn::float(format!("Close_Lag_{}", lag.lag), &lag.close));
            cols.push(FeatureColumn::float(format!("Volume_Lag_{}", lag.lag), &lag.volume));
        }
        for roll in &d.rolling {
            let w = roll.window;
            cols.push(FeatureColumn::float(format!("Close_Roll_Mean_{w}"), &roll.close_mean));
            cols.push(FeatureColumn::float(format!("Close_Roll_Std_{w}"), &roll.close_std));
            cols.push(FeatureColumn::float(format!("Volume_Roll_Mean_{w}"), &roll.volume_mean));
            cols.push(FeatureColumn::float(format!("Volume_Roll_Std_{w}"), &roll.volume_std));
        }

        cols.extend([
            FeatureColumn::float("Relative_Volume", &d.relative_volume),
            FeatureColumn::new("Day_of_Week", ColumnValues::Int(&d.day_of_week)),
            FeatureColumn::flag("Is_Month_End", &d.is_month_end),
            FeatureColumn::float("VWAP", &d.vwap),
            FeatureColumn::flag("High_Volume", &d.high_volume),
            FeatureColumn::flag("Significant_Price_Move", &d.significant_price_move),
            FeatureColumn::flag(
                "Volume_Spike_With_Price_Move",
                &d.volume_spike_with_price_move,
            ),
        ]);
        cols
    }

    pub fn column(&self, name: &str) -> Option<FeatureColumn<'_>> {
        self.columns().into_iter().find(|c| c.name == name)
    }

    /// Float column by name; `None` for unknown or non-float columns.
    pub fn floats(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(|c| c.as_floats())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().into_iter().map(|c| c.name).collect()
    }

    /// Content hash over the symbol and every column.
    pub fn fingerprint(&self) -> FeatureHash {
        fingerprint::fingerprint(self)
    }
}
