//! Row ordering by an index column.

use tracing::warn;

use crate::error::{ConvertError, ConvertResult};
use crate::types::DataSet;

use super::MissingColumnPolicy;

/// Stably sort `dataset` by `column`, ascending with nulls last.
///
/// Returns whether the rows were sorted. A missing column is skipped (with a warning) or
/// rejected according to `policy`.
pub fn index_by(dataset: &mut DataSet, column: &str, policy: MissingColumnPolicy) -> ConvertResult<bool> {
    if dataset.sort_by_column(column) {
        return Ok(true);
    }
    match policy {
        MissingColumnPolicy::Skip => {
            warn!(column, "index column not present; keeping input order");
            Ok(false)
        }
        MissingColumnPolicy::Fail => Err(ConvertError::SchemaMismatch {
            message: format!(
                "missing index column '{column}'. columns={:?}",
                dataset.column_names()
            ),
        }),
    }
}
