//! Serializable pipeline configuration.
//!
//! Every field has a default, so an empty TOML document (or none at all)
//! reproduces the stock run: RELIANCE.NS from Yahoo Finance over the trailing
//! 1000 calendar days, first five rows printed.

use crate::export::ExportFormat;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SYMBOL: &str = "RELIANCE.NS";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 1000;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which market-data provider to fetch from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Synthetic,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Ticker symbol, e.g. `RELIANCE.NS`
    pub symbol: String,

    /// Calendar days of history ending at `end`
    pub lookback_days: u32,

    /// Last date of the window; today when unset
    pub end: Option<NaiveDate>,

    pub source: SourceKind,

    /// Input file for `source = "csv"`
    pub csv_path: Option<PathBuf>,

    /// Seed for `source = "synthetic"`
    pub seed: u64,

    /// Where to write the feature table; nothing is written when unset
    pub output: Option<PathBuf>,

    /// Output format; inferred from the `output` extension when unset
    pub format: Option<ExportFormat>,

    /// Rows printed to stdout
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            end: None,
            source: SourceKind::default(),
            csv_path: None,
            seed: DEFAULT_SYNTHETIC_SEED,
            output: None,
            format: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if self.lookback_days == 0 {
            return Err(ConfigError::Invalid("lookback_days must be positive".into()));
        }
        if self.source == SourceKind::Csv && self.csv_path.is_none() {
            return Err(ConfigError::Invalid(
                "source = \"csv\" requires csv_path".into(),
            ));
        }
        Ok(())
    }

    /// `(start, end)` of the fetch window, with `today` standing in for an unset end.
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        let end = self.end.unwrap_or(today);
        let start = end
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "lookback of {} days from {end} is out of range",
                    self.lookback_days
                ))
            })?;
        Ok((start, end))
    }

    /// Explicit format, else inferred from the output path.
    pub fn output_format(&self) -> Option<ExportFormat> {
        let path = self.output.as_deref()?;
        Some(self.format.unwrap_or_else(|| ExportFormat::from_path(path)))
    }
}
