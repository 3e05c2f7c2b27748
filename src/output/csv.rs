//! CSV output implementation.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::DateTime;

use crate::error::{ConvertError, ConvertResult};
use crate::types::{DataSet, Value};

/// Write a [`DataSet`] to a CSV file, creating or truncating it.
///
/// The file gets one header line with the column names followed by one record per row. No row
/// index column is emitted. Fields are quoted only when they contain a comma, a quote or a line
/// break.
pub fn write_csv_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> ConvertResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ConvertError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut wtr = csv_writer_builder().from_writer(file);
    write_csv_to_writer(&mut wtr, dataset)
}

/// Write a [`DataSet`] through an existing CSV writer and flush it.
pub fn write_csv_to_writer<W: Write>(wtr: &mut csv::Writer<W>, dataset: &DataSet) -> ConvertResult<()> {
    if dataset.schema.fields.is_empty() {
        wtr.flush()?;
        return Ok(());
    }

    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(render_value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Builder with the output dialect: comma delimiter, `\n` terminator, minimal quoting.
pub fn csv_writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .has_headers(false);
    builder
}

/// Render a single value as CSV cell text.
///
/// - `Null` is an empty field.
/// - Floats use the shortest round-trip digits: integral values keep one decimal (`2.0`),
///   magnitudes below `1e-4` or from `1e16` up switch to exponent form (`1e-05`, `1e+16`).
/// - Booleans are `True` / `False`.
/// - Timestamps are `YYYY-MM-DD HH:MM:SS`, plus `.ffffff` when there is a sub-second part.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => render_float(*v),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Utf8(s) => s.clone(),
        Value::Timestamp(us) => render_timestamp(*us),
    }
}

fn render_float(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    // Shortest round-trip digits; positional between 1e-4 and 1e16, scientific outside.
    let sci = format!("{v:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if (-4..16).contains(&exp) {
        let fixed = v.to_string();
        if fixed.contains('.') { fixed } else { format!("{fixed}.0") }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

fn render_timestamp(micros: i64) -> String {
    match DateTime::from_timestamp_micros(micros) {
        Some(dt) => {
            let naive = dt.naive_utc();
            if dt.timestamp_subsec_micros() == 0 {
                naive.format("%Y-%m-%d %H:%M:%S").to_string()
            } else {
                naive.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
            }
        }
        None => micros.to_string(),
    }
}
