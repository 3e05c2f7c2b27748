use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parquet_csv_converter::convert::{ConvertOptions, Converter};
use parquet_csv_converter::observability::FileObserver;
use parquet_csv_converter::processing::MissingColumnPolicy;

/// Convert a Parquet trip-data file to CSV, renaming the pickup/dropoff columns and tagging
/// every row with `_measurement=taxi_data`.
#[derive(Parser, Debug)]
#[command(name = "parquet-csv-converter", version, about, long_about = None)]
struct Cli {
    /// Parquet input file [default: yellow_tripdata_2022-01.parquet]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV output file [default: yellow_tripdata_2022-01.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with conversion options; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sort rows by this column before writing
    #[arg(long)]
    sort_by: Option<String>,

    /// Write at most this many rows
    #[arg(long)]
    max_rows: Option<usize>,

    /// Fail instead of skipping when a rename or sort column is missing
    #[arg(long)]
    strict: bool,

    /// Append pipeline events to this file
    #[arg(long)]
    event_log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = build_options(cli)?;
    info!(?options, "starting conversion");

    let report = Converter::new(options).run().context("conversion failed")?;
    info!(
        rows_read = report.rows_read,
        rows_written = report.rows_written,
        skipped_renames = ?report.skipped_renames,
        output = %report.output.display(),
        "done"
    );
    Ok(())
}

fn build_options(cli: Cli) -> Result<ConvertOptions> {
    let mut options = match &cli.config {
        Some(path) => ConvertOptions::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConvertOptions::default(),
    };

    if let Some(input) = cli.input {
        options.input = input;
    }
    if let Some(output) = cli.output {
        options.output = output;
    }
    if cli.sort_by.is_some() {
        options.sort_by = cli.sort_by;
    }
    if cli.max_rows.is_some() {
        options.max_rows = cli.max_rows;
    }
    if cli.strict {
        options.missing_columns = MissingColumnPolicy::Fail;
    }
    if let Some(path) = cli.event_log {
        options.observer = Some(Arc::new(FileObserver::new(path)));
    }
    Ok(options)
}
