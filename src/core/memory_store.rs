//! In-process state store
//!
//! This module provides `MemoryStore`, a `HashMap`-backed `StateStore` used by
//! the script driver and the tests. It can be seeded from and written back to
//! a JSON snapshot file so state survives between runs.
//!
//! # Snapshot Format
//!
//! A snapshot is a JSON object mapping each key to its stored value verbatim:
//!
//! ```json
//! {
//!   "alice": "{\"accountId\":\"alice\",\"publicKey\":\"k1\",\"balance\":60.0}"
//! }
//! ```
//!
//! Values are kept as opaque strings; a corrupt record in a snapshot is only
//! reported when an operation reads it.
//!
//! Saving writes a temporary file next to the snapshot and renames it into
//! place, so an interrupted save leaves the previous snapshot intact.

use crate::core::traits::{StateStore, WriteSet};
use crate::types::{Account, LedgerError};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Key-value store held in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Map of keys to stored values
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore {
            entries: HashMap::new(),
        }
    }

    /// Load a store from a snapshot file
    ///
    /// A missing file yields an empty store, so the first run against a new
    /// state path starts from scratch.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read, or `ParseError` if
    /// it is not a JSON object of strings.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No state snapshot found, starting empty");
            return Ok(Self::new());
        }

        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open state file '{}': {}", path.display(), e),
        })?;
        let entries: HashMap<String, String> = serde_json::from_reader(BufReader::new(file))?;

        tracing::info!(path = %path.display(), keys = entries.len(), "Loaded state snapshot");
        Ok(MemoryStore { entries })
    }

    /// Write the store to a snapshot file, keys sorted
    ///
    /// # Errors
    ///
    /// Returns `Io` if the temporary file cannot be written or renamed over
    /// `path`. The existing snapshot is untouched in that case.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir).map_err(|e| LedgerError::Io {
            message: format!("Failed to create state file in '{}': {}", dir.display(), e),
        })?;
        let mut writer = BufWriter::new(file);

        let sorted: BTreeMap<&String, &String> = self.entries.iter().collect();
        serde_json::to_writer_pretty(&mut writer, &sorted).map_err(|e| LedgerError::Io {
            message: e.to_string(),
        })?;
        writer.write_all(b"\n")?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to replace state file '{}': {}", path.display(), e.error),
        })?;

        tracing::info!(path = %path.display(), keys = sorted.len(), "Saved state snapshot");
        Ok(())
    }

    /// Number of keys holding a value
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode every stored account, sorted by account id
    ///
    /// Records that fail to decode are logged and left out; they stay in the
    /// store untouched.
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .entries
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(key, value)| match Account::decode(key, value) {
                Ok(account) => Some(account),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping unreadable account record");
                    None
                }
            })
            .collect();
        accounts.sort_by(|a, b| a.account_id().cmp(b.account_id()));
        accounts
    }
}

impl StateStore for MemoryStore {
    fn get_state(&self, key: &str) -> Result<Option<String>, LedgerError> {
        Ok(self
            .entries
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned())
    }

    fn put_state(&mut self, key: &str, value: String) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&mut self, writes: WriteSet) -> Result<(), LedgerError> {
        // Inserting into a HashMap cannot fail, so the batch lands whole.
        self.entries.extend(writes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::{tempdir, NamedTempFile};

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        let mut writes = WriteSet::new();
        writes
            .stage(&Account::new("bob", "k2", Decimal::new(40, 0)))
            .unwrap();
        writes
            .stage(&Account::new("alice", "k1", Decimal::new(60, 0)))
            .unwrap();
        store.commit(writes).unwrap();
        store
    }

    #[test]
    fn test_new_creates_empty_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_state("alice").unwrap(), None);
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.put_state("alice", String::new()).unwrap();

        assert_eq!(store.get_state("alice").unwrap(), None);
        assert!(store.accounts().is_empty());
    }

    #[test]
    fn test_commit_applies_every_write() {
        let store = seeded();

        assert_eq!(store.len(), 2);
        assert!(store.get_state("alice").unwrap().is_some());
        assert!(store.get_state("bob").unwrap().is_some());
    }

    #[test]
    fn test_accounts_are_sorted_by_id() {
        let accounts = seeded().accounts();

        let ids: Vec<_> = accounts.iter().map(|a| a.account_id()).collect();
        assert_eq!(ids, vec!["alice", "bob"]);
    }

    #[test]
    fn test_accounts_skips_corrupt_record() {
        let mut store = seeded();
        store.put_state("carol", "garbage".to_string()).unwrap();

        let ids: Vec<_> = store
            .accounts()
            .iter()
            .map(|a| a.account_id().to_string())
            .collect();
        assert_eq!(ids, vec!["alice", "bob"]);
        assert_eq!(store.get_state("carol").unwrap().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_snapshot_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = seeded();

        store.save(&path).unwrap();
        let loaded = MemoryStore::load(&path).unwrap();

        assert_eq!(loaded.accounts(), store.accounts());
    }

    #[test]
    fn test_save_replaces_snapshot_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "stale").unwrap();

        seeded().save(&path).unwrap();

        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        seeded().save(&path).unwrap();
        let target_is_dir = dir.path().join("taken");
        std::fs::create_dir(&target_is_dir).unwrap();

        let result = MemoryStore::new().save(&target_is_dir);

        assert!(matches!(result, Err(LedgerError::Io { .. })));
        assert_eq!(MemoryStore::load(&path).unwrap().len(), 2);
        assert!(target_is_dir.is_dir());
    }

    #[test]
    fn test_load_missing_snapshot_starts_empty() {
        let dir = tempdir().unwrap();

        let store = MemoryStore::load(&dir.path().join("absent.json")).unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();
        file.flush().unwrap();

        let result = MemoryStore::load(file.path());

        assert!(matches!(result, Err(LedgerError::ParseError { .. })));
    }
}
