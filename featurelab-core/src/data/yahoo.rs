//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API with a single blocking
//! request. Any failure (network, HTTP status, unexpected payload) is returned
//! to the caller unchanged; there is no retry.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

/// Body of a v8 chart reply: either one series or an error record.
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<Series>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Series {
    meta: Option<ExchangeMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: SeriesColumns,
}

/// Exchange details; `gmtoffset` is the exchange's UTC offset in seconds.
#[derive(Debug, Default, Deserialize)]
struct ExchangeMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct SeriesColumns {
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdjCloseColumn {
    adjclose: Vec<Option<f64>>,
}

/// Value at `i`, treating a short column like a null.
fn cell<T: Copy>(column: &[Option<T>], i: usize) -> Option<T> {
    column.get(i).copied().flatten()
}

/// Trading date of a bar stamped `ts` seconds after the epoch, read on the
/// exchange's wall clock.
fn session_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    let local = ts.checked_add(gmtoffset)?;
    chrono::DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive())
}

impl Chart {
    /// The single series for `symbol`, or the error Yahoo reported instead.
    fn into_series(self, symbol: &str) -> Result<Series, DataError> {
        match (self.result, self.error) {
            (Some(series), _) => series
                .into_iter()
                .next()
                .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into())),
            (None, Some(err)) if err.code == "Not Found" => Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            }),
            (None, Some(err)) => Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            ))),
            (None, None) => Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            )),
        }
    }
}

impl Series {
    /// Rows in timestamp order. Rows where every quote field is null are
    /// market holidays and are dropped; a partly null row keeps NaN prices.
    fn into_raw_bars(self) -> Result<Vec<RawBar>, DataError> {
        if self.timestamp.is_empty() {
            return Err(DataError::ResponseFormatChanged("no timestamps".into()));
        }
        let gmtoffset = self.meta.unwrap_or_default().gmtoffset;
        let quote = self
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;
        let adjclose = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .unwrap_or_default()
            .adjclose;

        let mut bars = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let open = cell(&quote.open, i);
            let high = cell(&quote.high, i);
            let low = cell(&quote.low, i);
            let close = cell(&quote.close, i);
            let volume = cell(&quote.volume, i);
            if [open, high, low, close].iter().all(Option::is_none) && volume.is_none() {
                continue;
            }

            let date = session_date(ts, gmtoffset).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;
            bars.push(RawBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
                adj_close: cell(&adjclose, i).unwrap_or(f64::NAN),
            });
        }
        Ok(bars)
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    /// Build the chart API URL for a symbol and date range.
    ///
    /// The end date is exclusive: `period2` is midnight at the start of `end`.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Turn a decoded reply into bars; no rows at all means no data for `symbol`.
    fn parse_response(symbol: &str, body: ChartEnvelope) -> Result<Vec<RawBar>, DataError> {
        let bars = body.chart.into_series(symbol)?.into_raw_bars()?;
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if start > end {
            return Err(DataError::InvalidRange { start, end });
        }

        let url = Self::chart_url(symbol, start, end);
        debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ChartEnvelope = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_response(symbol, body)?;
        info!(symbol, rows = bars.len(), "fetched daily bars from Yahoo Finance");

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }
}
