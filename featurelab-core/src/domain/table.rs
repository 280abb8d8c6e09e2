//! OhlcvTable: the selected input to both feature stages.

use super::Bar;
use crate::data::provider::RawBar;
use chrono::NaiveDate;

/// Ordered daily bars for a single symbol.
///
/// Built once by the select step and only ever borrowed afterwards; both
/// feature stages read it and return new columns instead of mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvTable {
    symbol: String,
    bars: Vec<Bar>,
}

impl OhlcvTable {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Select Date/Open/High/Low/Close/Volume from provider rows.
    ///
    /// Row order is kept exactly as the provider returned it.
    pub fn select(symbol: impl Into<String>, raw: Vec<RawBar>) -> Self {
        let bars = raw
            .into_iter()
            .map(|r| Bar {
                date: r.date,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First `n` rows as a new table (or the whole table if shorter).
    pub fn prefix(&self, n: usize) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[..n.min(self.bars.len())].to_vec(),
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::volume_f64).collect()
    }
}
