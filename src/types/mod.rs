//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: The account record and its stored encoding
//! - `operation`: Ledger operation requests and outcomes
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod operation;

pub use account::{Account, AccountId, PublicKey};
pub use error::LedgerError;
pub use operation::{AccountOperation, OperationOutcome};
