//! Constant tag column.

use crate::types::{DataSet, DataType, Value};

/// Set string column `column` to `value` on every row.
///
/// See [`DataSet::set_constant_column`] for placement rules.
pub fn tag_rows(dataset: &mut DataSet, column: &str, value: &str) {
    dataset.set_constant_column(column, DataType::Utf8, Value::Utf8(value.to_owned()));
}
