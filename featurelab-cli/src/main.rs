//! FeatureLab CLI: fetch daily OHLCV history and print or export the feature table.
//!
//! Commands:
//! - `generate` (default when no command is given): fetch, compute features,
//!   preview the first rows and optionally write CSV/Parquet/JSON
//! - `columns`: list the feature columns in output order

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use featurelab_core::config::{PipelineConfig, SourceKind};
use featurelab_core::export::{self, ExportFormat};
use featurelab_core::features;
use featurelab_core::pipeline;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "featurelab",
    about = "FeatureLab CLI: technical feature tables from daily OHLCV history",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history, compute features, preview and optionally export.
    Generate(GenerateArgs),
    /// Print the feature columns in output order.
    Columns,
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to a TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker symbol. Defaults to RELIANCE.NS.
    #[arg(long)]
    symbol: Option<String>,

    /// Calendar days of history. Defaults to 1000.
    #[arg(long)]
    days: Option<u32>,

    /// Last date of the window (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Market-data source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// CSV file to read when --source csv.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Seed for --source synthetic.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the full feature table here.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format. Inferred from the --output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Rows to print. Defaults to 5.
    #[arg(long)]
    rows: Option<usize>,

    /// Print the table's content hash after the preview.
    #[arg(long, default_value_t = false)]
    fingerprint: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Yahoo,
    Synthetic,
    Csv,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => SourceKind::Yahoo,
            SourceArg::Synthetic => SourceKind::Synthetic,
            SourceArg::Csv => SourceKind::Csv,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Parquet,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Parquet => ExportFormat::Parquet,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

/// Logs go to stderr; stdout carries the table preview.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Columns) => run_columns(),
        Some(Commands::Generate(args)) => run_generate(args),
        None => run_generate(cli.generate),
    }
}

fn run_columns() -> Result<()> {
    for name in features::catalogue() {
        println!("{name}");
    }
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(args: &GenerateArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(symbol) = &args.symbol {
        config.symbol = symbol.clone();
    }
    if let Some(days) = args.days {
        config.lookback_days = days;
    }
    if let Some(end) = args.end {
        config.end = Some(end);
    }
    if let Some(source) = args.source {
        config.source = source.into();
    }
    if let Some(csv) = &args.csv {
        config.csv_path = Some(csv.clone());
        // A CSV path on its own implies the CSV source
        if args.source.is_none() {
            config.source = SourceKind::Csv;
        }
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if let Some(format) = args.format {
        config.format = Some(format.into());
    }
    if let Some(rows) = args.rows {
        config.preview_rows = rows;
    }

    config.validate()?;
    Ok(config)
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let provider = pipeline::provider_for(&config)?;
    let table = pipeline::run(&config, provider.as_ref())?;

    println!("{}", export::preview(&table, config.preview_rows)?);

    if args.fingerprint {
        println!("fingerprint: {}", table.fingerprint());
    }

    if let (Some(path), Some(format)) = (config.output.as_deref(), config.output_format()) {
        export::write(&table, path, format)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), ?format, "feature table exported");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_uses_stock_defaults() {
        let cli = Cli::try_parse_from(["featurelab"]).unwrap();
        assert!(cli.command.is_none());
        let config = resolve_config(&cli.generate).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "featurelab",
            "generate",
            "--symbol",
            "TCS.NS",
            "--days",
            "300",
            "--end",
            "2024-06-28",
            "--source",
            "synthetic",
            "--output",
            "out.json",
            "--rows",
            "3",
        ])
        .unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.symbol, "TCS.NS");
        assert_eq!(config.lookback_days, 300);
        assert_eq!(config.end, NaiveDate::from_ymd_opt(2024, 6, 28));
        assert_eq!(config.source, SourceKind::Synthetic);
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.output_format(), Some(ExportFormat::Json));
    }

    #[test]
    fn csv_path_implies_csv_source() {
        let cli = Cli::try_parse_from(["featurelab", "--csv", "prices.csv"]).unwrap();
        let config = resolve_config(&cli.generate).unwrap();
        assert_eq!(config.source, SourceKind::Csv);
    }

    #[test]
    fn columns_subcommand_parses() {
        let cli = Cli::try_parse_from(["featurelab", "columns"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Columns)));
    }
}
