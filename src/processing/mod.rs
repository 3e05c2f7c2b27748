//! In-place edits applied to a loaded [`crate::types::DataSet`].
//!
//! The converter runs these in a fixed order:
//!
//! - [`rename_columns()`]: relabel columns from a fixed rename map
//! - [`tag_rows()`]: add (or overwrite) a constant string column
//! - [`index_by()`]: optional stable sort by one column
//! - [`limit_rows()`]: optional row cap
//!
//! ## Example
//!
//! ```rust
//! use parquet_csv_converter::processing::{rename_columns, tag_rows, ColumnRename, MissingColumnPolicy};
//! use parquet_csv_converter::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let mut ds = DataSet::new(
//!     Schema::new(vec![Field::new("tpep_pickup_datetime", DataType::Timestamp)]),
//!     vec![vec![Value::Timestamp(0)]],
//! );
//!
//! let renames = [ColumnRename::new("tpep_pickup_datetime", "pickup_datetime")];
//! let outcome = rename_columns(&mut ds, &renames, MissingColumnPolicy::Skip).unwrap();
//! assert_eq!(outcome.applied.len(), 1);
//!
//! tag_rows(&mut ds, "_measurement", "taxi_data");
//! assert_eq!(ds.column_names(), vec!["pickup_datetime", "_measurement"]);
//! ```

pub mod index;
pub mod limit;
pub mod rename;
pub mod tag;

use serde::{Deserialize, Serialize};

pub use index::index_by;
pub use limit::limit_rows;
pub use rename::{rename_columns, ColumnRename, RenameOutcome};
pub use tag::tag_rows;

/// What to do when an edit names a column the table does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// Skip the edit for that column and carry on.
    #[default]
    Skip,
    /// Abort with [`crate::error::ConvertError::SchemaMismatch`].
    Fail,
}
