use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error type returned by every stage of the conversion pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The Parquet input could not be opened (missing file, permission denied).
    #[error("cannot open input '{}': {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV destination could not be created.
    #[error("cannot create output '{}': {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O error outside of open/create (e.g. flushing the output).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input is not a readable Parquet file.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A column required by a strict policy is absent from the table.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Invalid configuration value.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Configuration file is not valid JSON for [`crate::convert::ConvertOptions`].
    #[error("config file error: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}
