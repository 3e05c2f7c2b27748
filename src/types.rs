//! Core data model types.
//!
//! A Parquet file is loaded into an in-memory [`DataSet`]: a [`Schema`] (an ordered list of typed
//! [`Field`]s) plus row-major [`Value`] storage. The conversion edits operate on it in place.

use std::cmp::Ordering;

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Naive timestamp with microsecond precision.
    Timestamp,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Microseconds since the Unix epoch, no time zone attached.
    Timestamp(i64),
}

impl Value {
    /// Total order used when sorting rows by a column.
    ///
    /// Values of the same variant compare naturally (floats via `total_cmp`), nulls sort after
    /// everything else, and mixed variants fall back to a fixed variant rank.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Utf8(a), Value::Utf8(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int64(_) => 1,
            Value::Float64(_) => 2,
            Value::Timestamp(_) => 3,
            Value::Utf8(_) => 4,
            Value::Null => 5,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Rename the first column called `from` to `to`.
    ///
    /// Returns `false` (and leaves the dataset untouched) if no such column exists.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.schema.index_of(from) {
            Some(idx) => {
                self.schema.fields[idx].name = to.to_owned();
                true
            }
            None => false,
        }
    }

    /// Set column `name` to `value` on every row.
    ///
    /// An existing column keeps its position and has its values (and type) replaced; otherwise
    /// the column is appended.
    pub fn set_constant_column(&mut self, name: &str, data_type: DataType, value: Value) {
        match self.schema.index_of(name) {
            Some(idx) => {
                self.schema.fields[idx].data_type = data_type;
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.schema.fields.push(Field::new(name, data_type));
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// Stable sort of all rows by column `name`, ascending, nulls last.
    ///
    /// Returns `false` (and leaves row order untouched) if the column does not exist.
    pub fn sort_by_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.schema.index_of(name) else {
            return false;
        };
        self.rows.sort_by(|a, b| a[idx].sort_cmp(&b[idx]));
        true
    }

    /// Keep at most the first `max_rows` rows.
    pub fn truncate_rows(&mut self, max_rows: usize) {
        self.rows.truncate(max_rows);
    }
}
