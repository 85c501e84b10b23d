//! I/O module
//!
//! Handles operation script parsing and account output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `script_reader` - Streaming script reader with iterator interface

pub mod csv_format;
pub mod script_reader;

pub use csv_format::{convert_csv_record, write_accounts_csv, CsvRecord};
pub use script_reader::ScriptReader;
