//! Output side of the converter.
//!
//! [`csv::write_csv_to_path`] serializes a [`crate::types::DataSet`] as comma-separated text.

pub mod csv;

pub use self::csv::{csv_writer_builder, render_value, write_csv_to_path, write_csv_to_writer};
