//! Script driver
//!
//! This module orchestrates one run of the ledger over an operation script:
//! 1. Load the state store (from a snapshot, if one is configured)
//! 2. Stream operations from the script with `ScriptReader`
//! 3. Apply each operation through the `Ledger`
//! 4. Save the store back to the snapshot
//! 5. Write the final account states to the output as CSV
//!
//! # Error Handling
//!
//! Fatal errors (unreadable script, unreadable snapshot, unwritable output,
//! store failures) abort the run. A malformed row or a rejected operation is
//! logged and skipped; it leaves the store untouched and processing continues
//! with the next row. A stored record that cannot be decoded is left out of
//! the output listing and kept in the snapshot as it was.

use crate::core::{Ledger, LedgerConfig, MemoryStore};
use crate::io::csv_format::write_accounts_csv;
use crate::io::script_reader::ScriptReader;
use crate::types::{AccountOperation, LedgerError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Counters for one script run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Operations that succeeded
    pub applied: usize,
    /// Operations the ledger refused
    pub rejected: usize,
    /// Rows that could not be parsed into an operation
    pub malformed: usize,
}

/// Runs operation scripts against a `MemoryStore`
#[derive(Debug, Clone, Default)]
pub struct ScriptDriver {
    ledger: Ledger,
    state_path: Option<PathBuf>,
}

impl ScriptDriver {
    /// Create a driver with the given ledger policy and no snapshot
    pub fn new(config: LedgerConfig) -> Self {
        ScriptDriver {
            ledger: Ledger::new(config),
            state_path: None,
        }
    }

    /// Load state from `path` before the run and save it back afterwards
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Process a script file and write the final account states to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if the script or snapshot cannot be read, the store
    /// fails, or the output cannot be written. Rejected operations are not
    /// errors here; they are counted in the returned summary.
    pub fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<RunSummary, LedgerError> {
        let mut store = match &self.state_path {
            Some(path) => MemoryStore::load(path)?,
            None => MemoryStore::new(),
        };

        let reader = ScriptReader::new(input_path)?;
        let summary = self.apply_all(&mut store, reader)?;

        if let Some(path) = &self.state_path {
            store.save(path)?;
        }

        write_accounts_csv(&store.accounts(), output)?;

        tracing::info!(
            applied = summary.applied,
            rejected = summary.rejected,
            malformed = summary.malformed,
            "Script processed"
        );
        Ok(summary)
    }

    /// Apply every operation from `operations` to `store`, in order
    ///
    /// # Errors
    ///
    /// Returns the first error that is not a rejected operation or a
    /// malformed row.
    pub fn apply_all<I>(
        &self,
        store: &mut MemoryStore,
        operations: I,
    ) -> Result<RunSummary, LedgerError>
    where
        I: IntoIterator<Item = Result<AccountOperation, LedgerError>>,
    {
        let mut summary = RunSummary::default();

        for result in operations {
            let operation = match result {
                Ok(operation) => operation,
                Err(e @ LedgerError::ParseError { .. }) => {
                    tracing::warn!(error = %e, "Skipping malformed script row");
                    summary.malformed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let name = operation.name();
            let account = operation.account_id().to_string();

            match self.ledger.apply(store, operation) {
                Ok(outcome) => {
                    tracing::info!(op = name, account = %account, "{}", outcome);
                    summary.applied += 1;
                }
                Err(e) if e.is_rejection() => {
                    tracing::warn!(op = name, account = %account, error = %e, "Operation rejected");
                    summary.rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }
}
