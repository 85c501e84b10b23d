//! Error types for the account ledger
//!
//! This module defines every failure a ledger operation can report, plus the
//! I/O and parsing failures of the script driver around it.
//!
//! # Error Categories
//!
//! - **Ledger Errors**: duplicate accounts, missing accounts, key mismatches,
//!   invalid amounts, insufficient balance
//! - **Record Errors**: a stored account value that cannot be decoded
//! - **Arithmetic Errors**: a balance that would overflow
//! - **Store / I/O / Parse Errors**: failures outside the ledger rules
//!
//! Every ledger error is terminal for the operation that raised it: nothing is
//! written to the store when one is returned.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the account ledger
///
/// Each variant carries the identifiers involved so the message shown to the
/// caller names the offending account.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An account with this id already exists
    #[error("Account {account_id} already exists")]
    AccountAlreadyExists { account_id: String },

    /// No account is stored under this id
    #[error("Account {account_id} does not exist")]
    AccountNotFound { account_id: String },

    /// The supplied public key does not match the stored one
    #[error("Account {account_id} is not associated with public key {public_key}")]
    Unauthorized {
        account_id: String,
        /// The key that was presented
        public_key: String,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from account {account_id} to itself")]
    SameAccount { account_id: String },

    /// Transfer amount is zero or negative
    #[error("Transfer amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    /// The transfer would drive the source balance below zero
    #[error(
        "Account {account_id} does not have enough balance: balance {balance}, requested {requested}"
    )]
    InsufficientBalance {
        account_id: String,
        balance: Decimal,
        requested: Decimal,
    },

    /// The value stored under an account key could not be decoded
    #[error("Malformed account record under key '{key}': {message}")]
    MalformedRecord { key: String, message: String },

    /// A new account was requested with a negative opening balance
    #[error("Initial balance for account {account_id} cannot be negative, got {balance}")]
    InvalidInitialBalance { account_id: String, balance: Decimal },

    /// An administrative update would set a negative balance
    ///
    /// Only raised when the update floor is enforced by configuration.
    #[error("Balance for account {account_id} cannot be negative, got {balance}")]
    InvalidBalance { account_id: String, balance: Decimal },

    /// A balance cannot be stored without changing its value
    ///
    /// Records hold balances as JSON numbers, so a value with more
    /// significant digits than a double carries is refused before any write.
    #[error("Balance {balance} for account {account_id} cannot be stored exactly")]
    UnrepresentableBalance { account_id: String, balance: Decimal },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account_id}")]
    ArithmeticOverflow {
        operation: String,
        account_id: String,
    },

    /// The state store failed to read or write
    #[error("State store error: {message}")]
    Store { message: String },

    /// I/O error while reading scripts or writing output
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Operation script or snapshot could not be parsed
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return LedgerError::Io {
                message: error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        let line = (error.line() > 0).then_some(error.line() as u64);

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    pub fn account_already_exists(account_id: &str) -> Self {
        LedgerError::AccountAlreadyExists {
            account_id: account_id.to_string(),
        }
    }

    pub fn account_not_found(account_id: &str) -> Self {
        LedgerError::AccountNotFound {
            account_id: account_id.to_string(),
        }
    }

    pub fn unauthorized(account_id: &str, public_key: &str) -> Self {
        LedgerError::Unauthorized {
            account_id: account_id.to_string(),
            public_key: public_key.to_string(),
        }
    }

    pub fn same_account(account_id: &str) -> Self {
        LedgerError::SameAccount {
            account_id: account_id.to_string(),
        }
    }

    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    pub fn insufficient_balance(account_id: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            account_id: account_id.to_string(),
            balance,
            requested,
        }
    }

    pub fn malformed_record(key: &str, message: &str) -> Self {
        LedgerError::MalformedRecord {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_initial_balance(account_id: &str, balance: Decimal) -> Self {
        LedgerError::InvalidInitialBalance {
            account_id: account_id.to_string(),
            balance,
        }
    }

    pub fn invalid_balance(account_id: &str, balance: Decimal) -> Self {
        LedgerError::InvalidBalance {
            account_id: account_id.to_string(),
            balance,
        }
    }

    pub fn unrepresentable_balance(account_id: &str, balance: Decimal) -> Self {
        LedgerError::UnrepresentableBalance {
            account_id: account_id.to_string(),
            balance,
        }
    }

    pub fn arithmetic_overflow(operation: &str, account_id: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_id: account_id.to_string(),
        }
    }

    pub fn store(message: &str) -> Self {
        LedgerError::Store {
            message: message.to_string(),
        }
    }

    /// Whether this error is a rejected ledger operation rather than an
    /// infrastructure failure
    ///
    /// The script driver skips rejected operations and keeps going; anything
    /// else aborts the run.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            LedgerError::Store { .. } | LedgerError::Io { .. } | LedgerError::ParseError { .. }
        )
    }
}
