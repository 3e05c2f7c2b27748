//! Optional row cap.

use crate::types::DataSet;

/// Keep at most `max_rows` rows from the front of the table. `None` keeps everything.
///
/// Returns the number of rows dropped.
pub fn limit_rows(dataset: &mut DataSet, max_rows: Option<usize>) -> usize {
    let before = dataset.row_count();
    if let Some(n) = max_rows {
        dataset.truncate_rows(n);
    }
    before - dataset.row_count()
}

#[cfg(test)]
mod tests {
    use super::limit_rows;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numbered(n: i64) -> DataSet {
        DataSet::new(
            Schema::new(vec![Field::new("n", DataType::Int64)]),
            (0..n).map(|i| vec![Value::Int64(i)]).collect(),
        )
    }

    #[test]
    fn no_cap_keeps_all_rows() {
        let mut ds = numbered(5);
        assert_eq!(limit_rows(&mut ds, None), 0);
        assert_eq!(ds.row_count(), 5);
    }

    #[test]
    fn cap_keeps_leading_rows() {
        let mut ds = numbered(5);
        assert_eq!(limit_rows(&mut ds, Some(2)), 3);
        assert_eq!(ds.rows, vec![vec![Value::Int64(0)], vec![Value::Int64(1)]]);
    }
}
