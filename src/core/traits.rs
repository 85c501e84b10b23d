//! State store abstraction
//!
//! The ledger never owns account data. It reads and writes account records
//! through a key-value store supplied by the host, one call at a time. This
//! module defines that seam so an in-process map, a file-backed snapshot or a
//! host platform's world state can all sit behind the same operations.

use crate::types::{Account, LedgerError};

/// Key-value store holding serialized account records
///
/// Keys are account ids, values are `Account` encodings. The ledger never
/// iterates over keys.
pub trait StateStore {
    /// Read the value stored under `key`
    ///
    /// Returns `Ok(None)` if nothing is stored. An empty value is reported
    /// as `None` as well; callers never see `Some("")`.
    fn get_state(&self, key: &str) -> Result<Option<String>, LedgerError>;

    /// Write `value` under `key`, replacing any previous value
    fn put_state(&mut self, key: &str, value: String) -> Result<(), LedgerError>;

    /// Apply a set of staged writes as one unit
    ///
    /// The default writes each entry in order. Stores that can fail half-way
    /// through a sequence of puts must override this so that either every
    /// write in the set becomes visible or none does.
    fn commit(&mut self, writes: WriteSet) -> Result<(), LedgerError> {
        for (key, value) in writes {
            self.put_state(&key, value)?;
        }
        Ok(())
    }
}

/// Writes staged by one ledger operation, applied together on commit
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteSet {
    writes: Vec<(String, String)>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `account` and stage it under its own id
    ///
    /// Staging the same account twice keeps only the later value.
    pub fn stage(&mut self, account: &Account) -> Result<(), LedgerError> {
        let value = account.encode()?;
        let key = account.account_id();

        match self.writes.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some(entry) => entry.1 = value,
            None => self.writes.push((key.to_string(), value)),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Keys touched by this write set, in staging order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.writes.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for WriteSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    /// Store that only implements the required methods, to exercise the
    /// default `commit`
    #[derive(Default)]
    struct PlainStore {
        values: HashMap<String, String>,
        puts: usize,
    }

    impl StateStore for PlainStore {
        fn get_state(&self, key: &str) -> Result<Option<String>, LedgerError> {
            Ok(self.values.get(key).cloned())
        }

        fn put_state(&mut self, key: &str, value: String) -> Result<(), LedgerError> {
            self.puts += 1;
            self.values.insert(key.to_string(), value);
            Ok(())
        }
    }

    #[test]
    fn test_stage_encodes_under_account_id() {
        let mut writes = WriteSet::new();
        writes
            .stage(&Account::new("alice", "k1", Decimal::new(5, 0)))
            .unwrap();

        assert_eq!(writes.len(), 1);
        assert_eq!(writes.keys().collect::<Vec<_>>(), vec!["alice"]);
    }

    #[test]
    fn test_stage_same_account_twice_keeps_latest() {
        let mut writes = WriteSet::new();
        let mut account = Account::new("alice", "k1", Decimal::new(5, 0));
        writes.stage(&account).unwrap();
        account.set_balance(Decimal::new(9, 0));
        writes.stage(&account).unwrap();

        let entries: Vec<_> = writes.into_iter().collect();
        assert_eq!(entries.len(), 1);
        let decoded = Account::decode(&entries[0].0, &entries[0].1).unwrap();
        assert_eq!(decoded.balance(), Decimal::new(9, 0));
    }

    #[test]
    fn test_default_commit_puts_every_entry() {
        let mut store = PlainStore::default();
        let mut writes = WriteSet::new();
        writes.stage(&Account::new("alice", "k1", Decimal::ONE)).unwrap();
        writes.stage(&Account::new("bob", "k2", Decimal::TWO)).unwrap();

        store.commit(writes).unwrap();

        assert_eq!(store.puts, 2);
        assert!(store.get_state("alice").unwrap().is_some());
        assert!(store.get_state("bob").unwrap().is_some());
    }

    #[test]
    fn test_empty_write_set() {
        let writes = WriteSet::new();
        assert!(writes.is_empty());
        assert_eq!(writes.len(), 0);
    }
}
