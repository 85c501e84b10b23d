//! Operation script reader with iterator interface
//!
//! Provides a streaming iterator over ledger operations from a CSV script.
//! Delegates CSV format concerns to the csv_format module.
//!
//! ```no_run
//! use rust_account_ledger::io::ScriptReader;
//! use std::path::Path;
//!
//! let reader = ScriptReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(operation) => println!("Applying {}", operation.name()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Individual row errors are yielded as `ParseError` with the row's line
//!   number, and iteration continues with the next row

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{AccountOperation, LedgerError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over an operation script
#[derive(Debug)]
pub struct ScriptReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl ScriptReader {
    /// Open a script file
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be left off)
    /// - Use an 8KB buffer
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened, or `ParseError` if the
    /// header row cannot be read.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self { reader, headers })
    }
}

impl Iterator for ScriptReader {
    type Item = Result<AccountOperation, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();

        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => {
                let line = record.position().map(|pos| pos.line());
                let parsed = record
                    .deserialize::<CsvRecord>(Some(&self.headers))
                    .map_err(|e| e.to_string())
                    .and_then(convert_csv_record)
                    .map_err(|message| LedgerError::ParseError { line, message });
                Some(parsed)
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,account,counterparty,amount,key\n";

    /// Helper function to create a temporary script file for testing
    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes())
            .expect("Failed to write to temp file");
        file.write_all(rows.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_script_reader_fails_on_missing_file() {
        let result = ScriptReader::new(Path::new("nonexistent.csv"));

        let error = result.unwrap_err();
        assert!(error.to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_script_reader_reads_every_op() {
        let file = create_temp_csv(
            "create,alice,,100.0,k1\n\
             peek_key,alice,,,\n\
             peek_balance,alice,,,k1\n\
             update,alice,,5,\n\
             transfer,alice,bob,1.5,k1\n",
        );

        let operations: Vec<_> = ScriptReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let names: Vec<_> = operations.iter().map(|op| op.name()).collect();
        assert_eq!(
            names,
            vec!["create", "peek_key", "peek_balance", "update", "transfer"]
        );
        assert_eq!(
            operations[4],
            AccountOperation::Transfer {
                from: "alice".to_string(),
                to: "bob".to_string(),
                amount: Decimal::new(15, 1),
                public_key: "k1".to_string(),
            }
        );
    }

    #[test]
    fn test_script_reader_accepts_short_rows() {
        let file = create_temp_csv("peek_key,alice\n");

        let operations: Vec<_> = ScriptReader::new(file.path()).unwrap().collect();

        assert_eq!(
            operations,
            vec![Ok(AccountOperation::PeekPublicKey {
                account_id: "alice".to_string()
            })]
        );
    }

    #[test]
    fn test_script_reader_handles_whitespace() {
        let file = create_temp_csv("  create , alice ,  ,  100.0 , k1 \n");

        let operations: Vec<_> = ScriptReader::new(file.path()).unwrap().collect();

        assert_eq!(
            operations,
            vec![Ok(AccountOperation::Create {
                account_id: "alice".to_string(),
                public_key: "k1".to_string(),
                initial_balance: Decimal::new(100, 0),
            })]
        );
    }

    #[test]
    fn test_script_reader_includes_line_numbers_and_continues() {
        let file = create_temp_csv(
            "create,alice,,100.0,k1\n\
             update,alice,,invalid,\n\
             peek_key,alice,,,\n",
        );

        let results: Vec<_> = ScriptReader::new(file.path()).unwrap().collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[2].is_ok());
        let error = results[1].as_ref().unwrap_err();
        assert!(matches!(error, LedgerError::ParseError { line: Some(3), .. }));
        assert!(error.to_string().contains("Invalid amount"));
    }

    #[test]
    fn test_script_reader_empty_script() {
        let file = create_temp_csv("");

        let results: Vec<_> = ScriptReader::new(file.path()).unwrap().collect();

        assert!(results.is_empty());
    }
}
