//! Ledger operation requests and their outcomes
//!
//! An `AccountOperation` is one invocation of a ledger entry point, as read
//! from an operation script. `OperationOutcome` is what a successful
//! invocation returns to its caller.

use super::account::{Account, AccountId, PublicKey};
use rust_decimal::Decimal;
use std::fmt;

/// One request against the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum AccountOperation {
    /// Open a new account with an initial balance
    Create {
        account_id: AccountId,
        public_key: PublicKey,
        initial_balance: Decimal,
    },

    /// Look up the public key of any account (no credential needed)
    PeekPublicKey { account_id: AccountId },

    /// Read an account balance, proving ownership with its public key
    PeekBalance {
        account_id: AccountId,
        public_key: PublicKey,
    },

    /// Overwrite an account balance (administrative, no credential)
    UpdateBalance {
        account_id: AccountId,
        balance: Decimal,
    },

    /// Move `amount` from one account to another, authorized by the source key
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        public_key: PublicKey,
    },
}

impl AccountOperation {
    /// Short name used in logs and script files
    pub fn name(&self) -> &'static str {
        match self {
            AccountOperation::Create { .. } => "create",
            AccountOperation::PeekPublicKey { .. } => "peek_key",
            AccountOperation::PeekBalance { .. } => "peek_balance",
            AccountOperation::UpdateBalance { .. } => "update",
            AccountOperation::Transfer { .. } => "transfer",
        }
    }

    /// The account the operation is addressed to (the source, for transfers)
    pub fn account_id(&self) -> &str {
        match self {
            AccountOperation::Create { account_id, .. }
            | AccountOperation::PeekPublicKey { account_id }
            | AccountOperation::PeekBalance { account_id, .. }
            | AccountOperation::UpdateBalance { account_id, .. } => account_id,
            AccountOperation::Transfer { from, .. } => from,
        }
    }
}

/// Result of a successful ledger operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Created(Account),
    PublicKey(PublicKey),
    Balance(Decimal),
    BalanceUpdated,
    Transferred,
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationOutcome::Created(account) => write!(
                f,
                "created account {} with balance {}",
                account.account_id(),
                account.balance()
            ),
            OperationOutcome::PublicKey(key) => write!(f, "public key {}", key),
            OperationOutcome::Balance(balance) => write!(f, "balance {}", balance),
            OperationOutcome::BalanceUpdated => write!(f, "balance updated"),
            OperationOutcome::Transferred => write!(f, "transfer applied"),
        }
    }
}
