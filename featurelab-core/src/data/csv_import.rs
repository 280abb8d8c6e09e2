//! CSV import provider.
//!
//! Reads a local daily OHLCV file with a `Date,Open,High,Low,Close,Volume`
//! header (the layout Yahoo Finance exports). An `Adj Close` column is
//! accepted but optional. Dates may carry a time/offset suffix; only the
//! leading `YYYY-MM-DD` is used.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
    #[serde(rename = "Adj Close", default)]
    adj_close: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn import_error(&self, reason: impl Into<String>) -> DataError {
        DataError::CsvImport {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Read every row of the file, in file order.
    pub fn read_all(&self) -> Result<Vec<RawBar>, DataError> {
        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| self.import_error(e.to_string()))?;

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| self.import_error(e.to_string()))?;
            let date_part = row.date.get(..10).unwrap_or(&row.date);
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
                self.import_error(format!("row {}: bad date '{}': {e}", line + 1, row.date))
            })?;
            bars.push(RawBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.max(0.0).round() as u64,
                adj_close: row.adj_close.unwrap_or(row.close),
            });
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
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

        let bars: Vec<RawBar> = self
            .read_all()?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        info!(symbol, rows = bars.len(), path = %self.path.display(), "imported daily bars from CSV");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_yahoo_style_export() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02 00:00:00+05:30,100,105,99,104,103.5,1000\n\
             2024-01-03 00:00:00+05:30,104,106,101,102,101.5,2000.0\n",
        );
        let bars = CsvProvider::new(file.path()).read_all().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].volume, 2000);
        assert_eq!(bars[1].adj_close, 101.5);
    }

    #[test]
    fn adj_close_is_optional() {
        let file = write_csv("Date,Open,High,Low,Close,Volume\n2024-01-02,1,2,0.5,1.5,10\n");
        let bars = CsvProvider::new(file.path()).read_all().unwrap();
        assert_eq!(bars[0].adj_close, 1.5);
    }

    #[test]
    fn fetch_filters_to_range() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-02,1,2,0.5,1.5,10\n\
             2024-01-03,1,2,0.5,1.5,10\n\
             2024-01-04,1,2,0.5,1.5,10\n",
        );
        let provider = CsvProvider::new(file.path());
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let result = provider.fetch("TEST", day(3), day(4)).unwrap();
        assert_eq!(result.bars.len(), 2);
        assert_eq!(result.source, DataSource::CsvImport);

        let empty = provider.fetch("TEST", day(10), day(12));
        assert!(matches!(empty, Err(DataError::SymbolNotFound { .. })));
    }

    #[test]
    fn bad_date_is_reported() {
        let file = write_csv("Date,Open,High,Low,Close,Volume\nnot-a-date,1,2,0.5,1.5,10\n");
        let result = CsvProvider::new(file.path()).read_all();
        assert!(matches!(result, Err(DataError::CsvImport { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = CsvProvider::new("/nonexistent/featurelab.csv").read_all();
        assert!(matches!(result, Err(DataError::CsvImport { .. })));
    }
}
