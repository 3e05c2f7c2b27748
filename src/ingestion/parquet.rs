//! Parquet ingestion implementation.

use std::fs::File;
use std::path::Path;

use chrono::{Days, NaiveDate};
use parquet::basic::{ConvertedType, LogicalType, TimeUnit, Type as PhysicalType};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::Type;
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::types::{DataSet, DataType, Field as SchemaField, Schema, Value};

/// Read an entire Parquet file into an in-memory [`DataSet`].
///
/// The [`Schema`] is inferred from the file's top-level fields, in file order. Values are taken
/// from the Parquet record API (`RowIter`) and kept in file row order.
pub fn read_parquet_from_path(path: impl AsRef<Path>) -> ConvertResult<DataSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConvertError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = SerializedFileReader::new(file)?;

    let schema = infer_parquet_schema(&reader);
    let decoders = column_decoders(&reader);
    let expected_rows = usize::try_from(reader.metadata().file_metadata().num_rows()).unwrap_or(0);
    debug!(
        path = %path.display(),
        columns = schema.fields.len(),
        rows = expected_rows,
        "parquet metadata loaded"
    );

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(expected_rows);
    for row_res in reader.into_iter() {
        let row = row_res?;
        let out_row: Vec<Value> = row
            .get_column_iter()
            .zip(decoders.iter())
            .map(|((_, field), decoder)| decode_field(*decoder, field))
            .collect();
        rows.push(out_row);
    }

    Ok(DataSet::new(schema, rows))
}

/// Derive a [`Schema`] from the top-level fields of a Parquet file.
pub fn infer_parquet_schema<R: FileReader>(reader: &R) -> Schema {
    let root = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema();
    let fields = root
        .get_fields()
        .iter()
        .map(|t| SchemaField::new(t.name(), logical_data_type(t)))
        .collect();
    Schema::new(fields)
}

/// How a column's record values are turned into [`Value`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnDecoder {
    /// Use the record API's own field variant.
    Native,
    /// INT64 nanoseconds since the epoch; the record API hands these out as plain longs.
    TimestampNanos,
}

fn column_decoders<R: FileReader>(reader: &R) -> Vec<ColumnDecoder> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|t| column_decoder(t))
        .collect()
}

fn column_decoder(t: &Type) -> ColumnDecoder {
    if t.is_primitive()
        && matches!(
            t.get_basic_info().logical_type_ref(),
            Some(LogicalType::Timestamp {
                unit: TimeUnit::NANOS { .. },
                ..
            })
        )
    {
        ColumnDecoder::TimestampNanos
    } else {
        ColumnDecoder::Native
    }
}

fn decode_field(decoder: ColumnDecoder, f: &Field) -> Value {
    match (decoder, f) {
        (ColumnDecoder::TimestampNanos, Field::Long(ns)) => Value::Timestamp(ns.div_euclid(1_000)),
        _ => convert_parquet_field(f),
    }
}

fn logical_data_type(t: &Type) -> DataType {
    if !t.is_primitive() {
        return DataType::Utf8;
    }
    let info = t.get_basic_info();
    if matches!(info.logical_type_ref(), Some(LogicalType::Timestamp { .. }))
        || matches!(
            info.converted_type(),
            ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS
        )
    {
        return DataType::Timestamp;
    }
    if matches!(info.converted_type(), ConvertedType::DATE | ConvertedType::DECIMAL) {
        return DataType::Utf8;
    }
    match t.get_physical_type() {
        PhysicalType::BOOLEAN => DataType::Bool,
        PhysicalType::INT32 | PhysicalType::INT64 => DataType::Int64,
        PhysicalType::FLOAT | PhysicalType::DOUBLE => DataType::Float64,
        PhysicalType::INT96 => DataType::Timestamp,
        _ => DataType::Utf8,
    }
}

fn convert_parquet_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Int64(i64::from(*v)),
        Field::Short(v) => Value::Int64(i64::from(*v)),
        Field::Int(v) => Value::Int64(i64::from(*v)),
        Field::Long(v) => Value::Int64(*v),
        Field::UByte(v) => Value::Int64(i64::from(*v)),
        Field::UShort(v) => Value::Int64(i64::from(*v)),
        Field::UInt(v) => Value::Int64(i64::from(*v)),
        // Out-of-range u64 keeps its digits as text rather than wrapping.
        Field::ULong(v) => i64::try_from(*v)
            .map(Value::Int64)
            .unwrap_or_else(|_| Value::Utf8(v.to_string())),
        Field::Float(v) => float_value(f64::from(*v)),
        Field::Double(v) => float_value(*v),
        Field::Str(s) => Value::Utf8(s.clone()),
        Field::Bytes(b) => Value::Utf8(String::from_utf8_lossy(b.data()).into_owned()),
        Field::TimestampMillis(ms) => ms
            .checked_mul(1_000)
            .map(Value::Timestamp)
            .unwrap_or_else(|| Value::Utf8(f.to_string())),
        Field::TimestampMicros(us) => Value::Timestamp(*us),
        Field::Date(days) => date_value(*days).unwrap_or_else(|| Value::Utf8(f.to_string())),
        other => Value::Utf8(other.to_string()),
    }
}

fn float_value(v: f64) -> Value {
    if v.is_nan() {
        Value::Null
    } else {
        Value::Float64(v)
    }
}

fn date_value(days_since_epoch: i32) -> Option<Value> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let date = if days_since_epoch >= 0 {
        epoch.checked_add_days(Days::new(u64::from(days_since_epoch.unsigned_abs())))?
    } else {
        epoch.checked_sub_days(Days::new(u64::from(days_since_epoch.unsigned_abs())))?
    };
    Some(Value::Utf8(date.format("%Y-%m-%d").to_string()))
}
