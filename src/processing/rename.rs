//! Column relabelling for [`crate::types::DataSet`].

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::types::DataSet;

use super::MissingColumnPolicy;

/// One entry of a rename map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRename<'a> {
    /// Existing column name.
    pub from: &'a str,
    /// Replacement name.
    pub to: &'a str,
}

impl<'a> ColumnRename<'a> {
    pub const fn new(from: &'a str, to: &'a str) -> Self {
        Self { from, to }
    }
}

/// Which rename entries matched and which did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    /// `(from, to)` pairs that were applied, in map order.
    pub applied: Vec<(String, String)>,
    /// Source names absent from the table.
    pub skipped: Vec<String>,
}

/// Apply `renames` to the column labels of `dataset`, in place.
///
/// With [`MissingColumnPolicy::Skip`] unmatched entries are ignored and reported in
/// [`RenameOutcome::skipped`]. With [`MissingColumnPolicy::Fail`] the first unmatched entry
/// yields an error and the dataset is left unchanged.
pub fn rename_columns(
    dataset: &mut DataSet,
    renames: &[ColumnRename<'_>],
    policy: MissingColumnPolicy,
) -> ConvertResult<RenameOutcome> {
    if policy == MissingColumnPolicy::Fail {
        if let Some(missing) = renames
            .iter()
            .find(|r| dataset.schema.index_of(r.from).is_none())
        {
            return Err(ConvertError::SchemaMismatch {
                message: format!(
                    "cannot rename missing column '{}' to '{}'. columns={:?}",
                    missing.from,
                    missing.to,
                    dataset.column_names()
                ),
            });
        }
    }

    let mut outcome = RenameOutcome::default();
    for r in renames {
        if dataset.rename_column(r.from, r.to) {
            outcome.applied.push((r.from.to_owned(), r.to.to_owned()));
        } else {
            debug!(column = r.from, "rename skipped: column not present");
            outcome.skipped.push(r.from.to_owned());
        }
    }
    Ok(outcome)
}
