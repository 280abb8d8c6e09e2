//! Indicator stage: OHLCV bars in, technical indicator columns out.
//!
//! The four families read the same immutable bars and share nothing else,
//! so they are computed concurrently.

use super::params::{
    BOLLINGER_PERIOD, BOLLINGER_STD_MULTIPLIER, CMF_PERIOD, MACD_FAST_SPAN, MACD_SLOW_SPAN,
    OSCILLATOR_PERIOD,
};
use crate::domain::{Bar, OhlcvTable};
use crate::indicators::{
    Adx, Atr, Bollinger, Cmf, Ema, Indicator, Macd, Obv, Rsi, Sma, StochasticOscillator,
    WilliamsR,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TrendColumns {
    pub sma_20: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub sma_100: Vec<f64>,
    pub sma_200: Vec<f64>,
    pub ema_20: Vec<f64>,
    pub ema_50: Vec<f64>,
    pub ema_63: Vec<f64>,
    pub ema_100: Vec<f64>,
    pub ema_200: Vec<f64>,
    pub macd: Vec<f64>,
    pub adx: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct MomentumColumns {
    pub rsi: Vec<f64>,
    pub stoch_osc: Vec<f64>,
    pub williams_r: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct VolatilityColumns {
    pub bb_low: Vec<f64>,
    pub bb_mid: Vec<f64>,
    pub bb_upp: Vec<f64>,
    pub atr: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct VolumeColumns {
    pub obv: Vec<f64>,
    pub cmf: Vec<f64>,
}

/// Output of the indicator stage, grouped by indicator family.
#[derive(Debug, Clone)]
pub struct IndicatorColumns {
    pub trend: TrendColumns,
    pub momentum: MomentumColumns,
    pub volatility: VolatilityColumns,
    pub volume: VolumeColumns,
}

fn trend_columns(bars: &[Bar]) -> TrendColumns {
    TrendColumns {
        sma_20: Sma::new(20).compute(bars),
        sma_50: Sma::new(50).compute(bars),
        sma_100: Sma::new(100).compute(bars),
        sma_200: Sma::new(200).compute(bars),
        ema_20: Ema::new(20).compute(bars),
        ema_50: Ema::new(50).compute(bars),
        ema_63: Ema::new(63).compute(bars),
        ema_100: Ema::new(100).compute(bars),
        ema_200: Ema::new(200).compute(bars),
        macd: Macd::new(MACD_FAST_SPAN, MACD_SLOW_SPAN).compute(bars),
        adx: Adx::new(OSCILLATOR_PERIOD).compute(bars),
    }
}

fn momentum_columns(bars: &[Bar]) -> MomentumColumns {
    MomentumColumns {
        rsi: Rsi::new(OSCILLATOR_PERIOD).compute(bars),
        stoch_osc: StochasticOscillator::new(OSCILLATOR_PERIOD).compute(bars),
        williams_r: WilliamsR::new(OSCILLATOR_PERIOD).compute(bars),
    }
}

fn volatility_columns(bars: &[Bar]) -> VolatilityColumns {
    VolatilityColumns {
        bb_low: Bollinger::lower(BOLLINGER_PERIOD, BOLLINGER_STD_MULTIPLIER).compute(bars),
        bb_mid: Bollinger::middle(BOLLINGER_PERIOD, BOLLINGER_STD_MULTIPLIER).compute(bars),
        bb_upp: Bollinger::upper(BOLLINGER_PERIOD, BOLLINGER_STD_MULTIPLIER).compute(bars),
        atr: Atr::new(OSCILLATOR_PERIOD).compute(bars),
    }
}

fn volume_columns(bars: &[Bar]) -> VolumeColumns {
    VolumeColumns {
        obv: Obv::new().compute(bars),
        cmf: Cmf::new(CMF_PERIOD).compute(bars),
    }
}

/// Compute every indicator column for the table.
pub fn indicator_stage(table: &OhlcvTable) -> IndicatorColumns {
    let bars = table.bars();
    let ((trend, momentum), (volatility, volume)) = rayon::join(
        || rayon::join(|| trend_columns(bars), || momentum_columns(bars)),
        || rayon::join(|| volatility_columns(bars), || volume_columns(bars)),
    );
    debug!(rows = bars.len(), "indicator stage complete");

    IndicatorColumns {
        trend,
        momentum,
        volatility,
        volume,
    }
}
