//! The Parquet → CSV conversion pipeline.
//!
//! [`Converter::run`] performs, in order and without branching back:
//!
//! 1. load the whole Parquet input ([`crate::ingestion::read_parquet_from_path`])
//! 2. rename `tpep_pickup_datetime` / `tpep_dropoff_datetime` ([`TAXI_RENAMES`])
//! 3. tag every row with `_measurement = taxi_data`
//! 4. optionally sort by [`ConvertOptions::sort_by`]
//! 5. optionally cap rows at [`ConvertOptions::max_rows`]
//! 6. write the CSV output ([`crate::output::write_csv_to_path`])
//!
//! Any failure aborts the pipeline; a partially written output file is left as is.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::error::{ConvertError, ConvertResult};
use crate::ingestion::read_parquet_from_path;
use crate::observability::{
    severity_for_error, ConversionContext, ConversionObserver, ConversionSeverity, ConversionStage, StageStats,
};
use crate::output::write_csv_to_path;
use crate::processing::{index_by, limit_rows, rename_columns, tag_rows, ColumnRename, MissingColumnPolicy};
use crate::types::DataSet;

/// Input path used when none is configured.
pub const DEFAULT_INPUT: &str = "yellow_tripdata_2022-01.parquet";
/// Output path used when none is configured.
pub const DEFAULT_OUTPUT: &str = "yellow_tripdata_2022-01.csv";

/// Fixed rename map applied to every conversion.
pub const TAXI_RENAMES: [ColumnRename<'static>; 2] = [
    ColumnRename::new("tpep_pickup_datetime", "pickup_datetime"),
    ColumnRename::new("tpep_dropoff_datetime", "dropoff_datetime"),
];

/// Name of the constant tag column.
pub const MEASUREMENT_COLUMN: &str = "_measurement";
/// Value written to [`MEASUREMENT_COLUMN`] on every row.
pub const MEASUREMENT_VALUE: &str = "taxi_data";

/// Options controlling a conversion.
///
/// Use [`Default`] to reproduce the fixed-path behavior; deserialize from JSON with
/// [`ConvertOptions::from_json_path`] (missing keys fall back to defaults).
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Parquet input path.
    pub input: PathBuf,
    /// CSV output path (created or overwritten).
    pub output: PathBuf,
    /// Policy for rename/index columns that are absent from the input.
    pub missing_columns: MissingColumnPolicy,
    /// If set, stably sort rows by this column before writing.
    pub sort_by: Option<String>,
    /// If set, write at most this many rows.
    pub max_rows: Option<usize>,
    /// Optional observer for stage events and outcomes.
    #[serde(skip)]
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    #[serde(skip)]
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("missing_columns", &self.missing_columns)
            .field("sort_by", &self.sort_by)
            .field("max_rows", &self.max_rows)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            missing_columns: MissingColumnPolicy::Skip,
            sort_by: None,
            max_rows: None,
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

impl ConvertOptions {
    /// Load options from a JSON file, e.g. `{"input": "jan.parquet", "sort_by": "pickup_datetime"}`.
    pub fn from_json_path(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConvertError::Config {
            message: format!("cannot read config file ({}): {e}", path.display()),
        })?;
        let opts: Self = serde_json::from_str(&raw)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject option values that can never produce a meaningful conversion.
    pub fn validate(&self) -> ConvertResult<()> {
        if self.input.as_os_str().is_empty() {
            return Err(ConvertError::Config {
                message: "input path is empty".to_string(),
            });
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConvertError::Config {
                message: "output path is empty".to_string(),
            });
        }
        if self.input == self.output {
            return Err(ConvertError::Config {
                message: format!("output would overwrite input ({})", self.input.display()),
            });
        }
        if matches!(self.sort_by.as_deref(), Some(c) if c.trim().is_empty()) {
            return Err(ConvertError::Config {
                message: "sort_by column name is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Summary of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    /// Parquet file that was read.
    pub input: PathBuf,
    /// CSV file that was written.
    pub output: PathBuf,
    /// Rows loaded from the input.
    pub rows_read: usize,
    /// Rows written to the output (differs from `rows_read` only under `max_rows`).
    pub rows_written: usize,
    /// Output header, in order.
    pub columns: Vec<String>,
    /// `(from, to)` renames that matched.
    pub renamed: Vec<(String, String)>,
    /// Rename sources that were absent from the input.
    pub skipped_renames: Vec<String>,
    /// Whether rows were reordered by `sort_by`.
    pub sorted: bool,
}

/// Outcome of the in-memory edits (everything between load and write).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSummary {
    /// `(from, to)` renames that matched.
    pub renamed: Vec<(String, String)>,
    /// Rename sources that were absent from the table.
    pub skipped_renames: Vec<String>,
    /// Whether rows were reordered by `sort_by`.
    pub sorted: bool,
    /// Rows removed by `max_rows`.
    pub rows_dropped: usize,
}

/// Runs the conversion pipeline for one set of [`ConvertOptions`].
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Run load → edits → write.
    ///
    /// When an observer is configured, this reports every completed stage, then `on_success`,
    /// or `on_failure` (plus `on_alert` when the severity reaches
    /// [`ConvertOptions::alert_at_or_above`]).
    pub fn run(&self) -> ConvertResult<ConvertReport> {
        let ctx = self.context();
        let _span = info_span!(
            "convert",
            input = %ctx.input.display(),
            output = %ctx.output.display()
        )
        .entered();

        let result = self.options.validate().and_then(|()| self.run_stages(&ctx));

        if let Some(obs) = self.options.observer.as_ref() {
            match &result {
                Ok(report) => obs.on_success(&ctx, report),
                Err(e) => {
                    let sev = severity_for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }

        result
    }

    /// Apply rename, tag, index and limit to an already loaded table.
    pub fn apply_edits(&self, dataset: &mut DataSet) -> ConvertResult<EditSummary> {
        self.apply_edits_with(&self.context(), dataset)
    }

    fn run_stages(&self, ctx: &ConversionContext) -> ConvertResult<ConvertReport> {
        let mut dataset = read_parquet_from_path(&self.options.input)?;
        let rows_read = dataset.row_count();
        self.stage(ctx, ConversionStage::Loaded, &dataset);

        let edits = self.apply_edits_with(ctx, &mut dataset)?;

        write_csv_to_path(&dataset, &self.options.output)?;
        self.stage(ctx, ConversionStage::Written, &dataset);

        Ok(ConvertReport {
            input: ctx.input.clone(),
            output: ctx.output.clone(),
            rows_read,
            rows_written: dataset.row_count(),
            columns: dataset.column_names(),
            renamed: edits.renamed,
            skipped_renames: edits.skipped_renames,
            sorted: edits.sorted,
        })
    }

    fn apply_edits_with(&self, ctx: &ConversionContext, dataset: &mut DataSet) -> ConvertResult<EditSummary> {
        let policy = self.options.missing_columns;

        let renames = rename_columns(dataset, &TAXI_RENAMES, policy)?;
        self.stage(ctx, ConversionStage::Renamed, dataset);

        tag_rows(dataset, MEASUREMENT_COLUMN, MEASUREMENT_VALUE);
        self.stage(ctx, ConversionStage::Tagged, dataset);

        let sorted = match self.options.sort_by.as_deref() {
            Some(column) => {
                let sorted = index_by(dataset, column, policy)?;
                self.stage(ctx, ConversionStage::Indexed, dataset);
                sorted
            }
            None => false,
        };

        let rows_dropped = limit_rows(dataset, self.options.max_rows);
        if self.options.max_rows.is_some() {
            self.stage(ctx, ConversionStage::Limited, dataset);
        }

        Ok(EditSummary {
            renamed: renames.applied,
            skipped_renames: renames.skipped,
            sorted,
            rows_dropped,
        })
    }

    fn stage(&self, ctx: &ConversionContext, stage: ConversionStage, dataset: &DataSet) {
        let stats = StageStats {
            rows: dataset.row_count(),
            columns: dataset.schema.fields.len(),
        };
        info!(stage = ?stage, rows = stats.rows, columns = stats.columns, "stage complete");
        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_stage(ctx, stage, stats);
        }
    }

    fn context(&self) -> ConversionContext {
        ConversionContext {
            input: self.options.input.clone(),
            output: self.options.output.clone(),
        }
    }
}

/// Convenience wrapper for `Converter::new(options).run()`.
pub fn convert(options: ConvertOptions) -> ConvertResult<ConvertReport> {
    Converter::new(options).run()
}
