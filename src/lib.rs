//! Rust Account Ledger Library
//! # Overview
//!
//! This library implements an account-balance ledger over an opaque key-value
//! store: accounts are created under unique ids, their public keys and
//! balances can be queried, and value moves between them through checked,
//! all-or-nothing transfers.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, AccountOperation, LedgerError)
//! - [`core`] - The transactional core:
//!   - [`core::ledger`] - Ledger operations
//!   - [`core::traits`] - The `StateStore` seam and staged writes
//!   - [`core::memory_store`] - In-process store with JSON snapshots
//!   - [`core::config`] - Ledger policy
//! - [`io`] - Operation script parsing and account CSV output
//! - [`driver`] - Runs a script against a store
//! - [`cli`] - CLI arguments parsing
//!
//! # Operations
//!
//! - **create**: Open an account with a public key and initial balance
//! - **peek_key**: Look up an account's public key (no credential)
//! - **peek_balance**: Read a balance, authorized by the account's key
//! - **update**: Administrative balance overwrite (no credential)
//! - **transfer**: Move value from one account to another, authorized by
//!   the source key; never overdraws the source
//!
//! # Example
//!
//! ```
//! use rust_account_ledger::{Ledger, LedgerConfig, MemoryStore};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new(LedgerConfig::default());
//! let mut store = MemoryStore::new();
//!
//! ledger.create_account(&mut store, "alice", "k1", Decimal::new(100, 0)).unwrap();
//! ledger.create_account(&mut store, "bob", "k2", Decimal::ZERO).unwrap();
//! ledger.transfer(&mut store, "alice", "bob", Decimal::new(40, 0), "k1").unwrap();
//!
//! assert_eq!(ledger.peek_balance(&store, "alice", "k1").unwrap(), Decimal::new(60, 0));
//! assert_eq!(ledger.peek_balance(&store, "bob", "k2").unwrap(), Decimal::new(40, 0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod driver;
pub mod io;
pub mod types;

pub use core::{Ledger, LedgerConfig, MemoryStore, StateStore, WriteSet};
pub use driver::{RunSummary, ScriptDriver};
pub use io::write_accounts_csv;
pub use types::{Account, AccountId, AccountOperation, LedgerError, OperationOutcome, PublicKey};
