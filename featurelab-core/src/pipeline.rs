//! End-to-end run: resolve the window, fetch, select columns, build features.

use crate::config::{ConfigError, PipelineConfig, SourceKind};
use crate::data::{CsvProvider, DataError, DataProvider, SyntheticProvider, YahooProvider};
use crate::domain::OhlcvTable;
use crate::features::{build_feature_table, FeatureTable};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Construct the provider named by the config.
pub fn provider_for(config: &PipelineConfig) -> Result<Box<dyn DataProvider>, PipelineError> {
    let provider: Box<dyn DataProvider> = match config.source {
        SourceKind::Yahoo => Box::new(YahooProvider::new()?),
        SourceKind::Synthetic => Box::new(SyntheticProvider::new(config.seed)),
        SourceKind::Csv => {
            let path = config.csv_path.clone().ok_or_else(|| {
                ConfigError::Invalid("source = \"csv\" requires csv_path".into())
            })?;
            Box::new(CsvProvider::new(path))
        }
    };
    Ok(provider)
}

/// Run with `today` as the default end date.
pub fn run_as_of(
    config: &PipelineConfig,
    provider: &dyn DataProvider,
    today: NaiveDate,
) -> Result<FeatureTable, PipelineError> {
    config.validate()?;
    let (start, end) = config.date_range(today)?;
    info!(
        symbol = %config.symbol,
        %start,
        %end,
        provider = provider.name(),
        "fetching history"
    );

    let fetched = provider.fetch(&config.symbol, start, end)?;
    let input = OhlcvTable::select(fetched.symbol, fetched.bars);
    if input.bars().iter().any(|b| !b.is_sane()) {
        warn!(symbol = input.symbol(), "provider returned bars outside low <= open/close <= high");
    }
    info!(rows = input.len(), source = ?fetched.source, "history loaded");

    Ok(build_feature_table(&input))
}

/// Run with the local calendar date as the default end date.
pub fn run(
    config: &PipelineConfig,
    provider: &dyn DataProvider,
) -> Result<FeatureTable, PipelineError> {
    run_as_of(config, provider, chrono::Local::now().date_naive())
}
