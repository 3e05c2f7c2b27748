#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique path under the system temp dir.
pub fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "parquet-csv-converter-{name}-{}-{nanos}-{n}.{ext}",
        std::process::id()
    ))
}

/// One column's worth of values, in schema order.
pub enum Col {
    Int64(Vec<i64>),
    /// Values for non-null slots plus definition levels.
    Int64OptDefs(Vec<i64>, Vec<i16>),
    /// Values for non-null slots plus optional definition levels.
    Double(Vec<f64>, Option<Vec<i16>>),
    Utf8(Vec<&'static str>),
}

pub fn write_parquet(path: &Path, schema_str: &str, cols: &[Col]) {
    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match (col.untyped(), &cols[col_idx]) {
            (ColumnWriter::Int64ColumnWriter(w), Col::Int64(values)) => {
                w.write_batch(values, None, None).unwrap();
            }
            (ColumnWriter::Int64ColumnWriter(w), Col::Int64OptDefs(values, defs)) => {
                w.write_batch(values, Some(defs), None).unwrap();
            }
            (ColumnWriter::DoubleColumnWriter(w), Col::Double(values, defs)) => {
                w.write_batch(values, defs.as_deref(), None).unwrap();
            }
            (ColumnWriter::ByteArrayColumnWriter(w), Col::Utf8(values)) => {
                let values: Vec<ByteArray> = values.iter().map(|s| ByteArray::from(*s)).collect();
                w.write_batch(&values, None, None).unwrap();
            }
            _ => panic!("column {col_idx} does not match its test data"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

pub const PICKUP_0035: i64 = 1_640_997_340_000_000; // 2022-01-01 00:35:40
pub const DROPOFF_0045: i64 = 1_640_997_940_000_000; // 2022-01-01 00:45:40
pub const PICKUP_0010: i64 = 1_640_995_800_000_000; // 2022-01-01 00:10:00
pub const DROPOFF_0020: i64 = 1_640_996_400_000_000; // 2022-01-01 00:20:00
pub const PICKUP_0100: i64 = 1_640_998_800_000_000; // 2022-01-01 01:00:00
pub const DROPOFF_0130: i64 = 1_641_000_600_000_000; // 2022-01-01 01:30:00

/// Three trips with `{tpep_pickup_datetime, tpep_dropoff_datetime, fare}`, pickups out of order.
pub fn write_trips(path: &Path) {
    write_parquet(
        path,
        r#"
        message schema {
          REQUIRED INT64 tpep_pickup_datetime (TIMESTAMP_MICROS);
          REQUIRED INT64 tpep_dropoff_datetime (TIMESTAMP_MICROS);
          REQUIRED DOUBLE fare;
        }
        "#,
        &[
            Col::Int64(vec![PICKUP_0035, PICKUP_0010, PICKUP_0100]),
            Col::Int64(vec![DROPOFF_0045, DROPOFF_0020, DROPOFF_0130]),
            Col::Double(vec![12.5, 8.0, 21.75], None),
        ],
    );
}

/// Trips without the `tpep_*` columns.
pub fn write_trips_without_tpep(path: &Path) {
    write_parquet(
        path,
        r#"
        message schema {
          REQUIRED INT64 VendorID;
          REQUIRED DOUBLE fare;
        }
        "#,
        &[
            Col::Int64(vec![1, 2, 2]),
            Col::Double(vec![12.5, 8.0, 21.75], None),
        ],
    );
}

/// Parse a CSV file into `(header, records)`.
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .unwrap();
    let header = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    let records = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_owned).collect())
        .collect();
    (header, records)
}

/// One trip whose timestamps are stored as nanoseconds, the pandas/pyarrow default.
pub fn write_nanosecond_trip(path: &Path) {
    write_parquet(
        path,
        r#"
        message schema {
          REQUIRED INT64 tpep_pickup_datetime (TIMESTAMP(NANOS,false));
          OPTIONAL INT64 tpep_dropoff_datetime (TIMESTAMP(NANOS,false));
          REQUIRED DOUBLE fare;
        }
        "#,
        &[
            Col::Int64(vec![PICKUP_0035 * 1_000, PICKUP_0010 * 1_000]),
            Col::Int64OptDefs(vec![DROPOFF_0045 * 1_000 + 250_000_000], vec![1, 0]),
            Col::Double(vec![1.0, 2.0], None),
        ],
    );
}
