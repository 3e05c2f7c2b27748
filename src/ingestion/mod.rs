//! Input side of the converter.
//!
//! [`parquet::read_parquet_from_path`] loads a whole Parquet file into a
//! [`crate::types::DataSet`], inferring the schema from the file metadata.

pub mod parquet;

pub use self::parquet::{infer_parquet_schema, read_parquet_from_path};
