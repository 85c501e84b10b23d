//! Core ledger module
//!
//! This module contains the transactional core:
//! - `traits` - The `StateStore` seam and staged `WriteSet`
//! - `memory_store` - In-process store with JSON snapshots
//! - `config` - Ledger policy switches
//! - `ledger` - The ledger operations

pub mod config;
pub mod ledger;
pub mod memory_store;
pub mod traits;

pub use config::LedgerConfig;
pub use ledger::Ledger;
pub use memory_store::MemoryStore;
pub use traits::{StateStore, WriteSet};
