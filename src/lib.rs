//! `parquet-csv-converter` loads a Parquet trip-data file into an in-memory [`types::DataSet`],
//! relabels the pickup/dropoff timestamp columns, tags every row with a `_measurement` label and
//! writes the result as CSV.
//!
//! The primary entrypoint is [`convert::Converter`] (or the [`convert::convert`] shorthand),
//! configured through [`convert::ConvertOptions`]. With default options it reads
//! `yellow_tripdata_2022-01.parquet` and writes `yellow_tripdata_2022-01.csv` in the working
//! directory.
//!
//! ## What a conversion does
//!
//! - **Load** the whole Parquet file; the schema is inferred from the file metadata.
//! - **Rename** `tpep_pickup_datetime` → `pickup_datetime` and
//!   `tpep_dropoff_datetime` → `dropoff_datetime`. Missing columns are skipped unless
//!   [`processing::MissingColumnPolicy::Fail`] is configured.
//! - **Tag** every row with `_measurement = taxi_data`.
//! - Optionally **sort** by a column ([`convert::ConvertOptions::sort_by`]) and **cap** the row
//!   count ([`convert::ConvertOptions::max_rows`]). Both are off by default, so row order and
//!   cardinality match the input.
//! - **Write** a comma-separated file with a header line and no index column.
//!
//! ## Quick example
//!
//! ```no_run
//! use parquet_csv_converter::convert::{convert, ConvertOptions};
//!
//! # fn main() -> Result<(), parquet_csv_converter::ConvertError> {
//! let report = convert(ConvertOptions {
//!     input: "trips.parquet".into(),
//!     output: "trips.csv".into(),
//!     ..Default::default()
//! })?;
//! println!("rows={} columns={:?}", report.rows_written, report.columns);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: options, pipeline and report
//! - [`ingestion`]: Parquet → [`types::DataSet`]
//! - [`processing`]: in-place rename/tag/index/limit edits
//! - [`output`]: [`types::DataSet`] → CSV
//! - [`observability`]: observer hooks for stage events and failures
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: error type shared by every stage

pub mod convert;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod processing;
pub mod types;

pub use error::{ConvertError, ConvertResult};
