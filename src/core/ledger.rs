//! Ledger operations
//!
//! This module provides the `Ledger`, which implements every account entry
//! point as a state transition over a `StateStore`:
//!
//! - `create_account` - open an account under a fresh id
//! - `peek_public_key` - look up any account's public key
//! - `peek_balance` - read a balance, proving ownership with the key
//! - `update_balance` - administrative balance overwrite
//! - `transfer` - move value between two accounts
//!
//! Every operation re-reads the records it needs, validates before it writes,
//! and commits all of its writes as one `WriteSet`. A failed check returns
//! before anything is staged, so a rejected operation never changes state.
//! The ledger itself holds no account data between calls.

use crate::core::config::LedgerConfig;
use crate::core::traits::{StateStore, WriteSet};
use crate::types::{Account, AccountOperation, LedgerError, OperationOutcome, PublicKey};
use rust_decimal::Decimal;

/// Account ledger
///
/// Holds only policy. The store is passed to every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ledger {
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger with the given policy
    pub fn new(config: LedgerConfig) -> Self {
        Ledger { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Apply a single operation
    ///
    /// Routes the operation to the matching entry point and wraps its result.
    ///
    /// # Errors
    ///
    /// Returns whatever the routed entry point returns.
    pub fn apply<S: StateStore>(
        &self,
        store: &mut S,
        operation: AccountOperation,
    ) -> Result<OperationOutcome, LedgerError> {
        match operation {
            AccountOperation::Create {
                account_id,
                public_key,
                initial_balance,
            } => self
                .create_account(store, &account_id, &public_key, initial_balance)
                .map(OperationOutcome::Created),
            AccountOperation::PeekPublicKey { account_id } => self
                .peek_public_key(store, &account_id)
                .map(OperationOutcome::PublicKey),
            AccountOperation::PeekBalance {
                account_id,
                public_key,
            } => self
                .peek_balance(store, &account_id, &public_key)
                .map(OperationOutcome::Balance),
            AccountOperation::UpdateBalance {
                account_id,
                balance,
            } => self
                .update_balance(store, &account_id, balance)
                .map(|()| OperationOutcome::BalanceUpdated),
            AccountOperation::Transfer {
                from,
                to,
                amount,
                public_key,
            } => self
                .transfer(store, &from, &to, amount, &public_key)
                .map(|()| OperationOutcome::Transferred),
        }
    }

    /// Open a new account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `initial_balance` is negative and the policy does not allow it
    /// - an account already exists under `account_id`
    /// - `initial_balance` cannot be stored exactly
    pub fn create_account<S: StateStore>(
        &self,
        store: &mut S,
        account_id: &str,
        public_key: &str,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        if initial_balance < Decimal::ZERO && !self.config.allow_negative_initial_balance {
            return Err(LedgerError::invalid_initial_balance(
                account_id,
                initial_balance,
            ));
        }

        if self.account_exists(store, account_id)? {
            return Err(LedgerError::account_already_exists(account_id));
        }

        let account = Account::new(account_id, public_key, initial_balance);

        let mut writes = WriteSet::new();
        writes.stage(&account)?;
        store.commit(writes)?;

        tracing::debug!(account = account_id, balance = %initial_balance, "Account created");
        Ok(account)
    }

    /// Check whether a record is stored under `account_id`
    pub(crate) fn account_exists<S: StateStore>(
        &self,
        store: &S,
        account_id: &str,
    ) -> Result<bool, LedgerError> {
        Ok(store.get_state(account_id)?.is_some())
    }

    /// Look up the public key of an account
    ///
    /// Public keys are not secret; no credential is required.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no account exists, or `MalformedRecord`
    /// if the stored record cannot be decoded.
    pub fn peek_public_key<S: StateStore>(
        &self,
        store: &S,
        account_id: &str,
    ) -> Result<PublicKey, LedgerError> {
        let account = load_account(store, account_id)?;
        Ok(account.public_key().to_string())
    }

    /// Read an account balance
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no account exists under `account_id`
    /// - `public_key` is not the key stored on the account
    pub fn peek_balance<S: StateStore>(
        &self,
        store: &S,
        account_id: &str,
        public_key: &str,
    ) -> Result<Decimal, LedgerError> {
        let account = load_account(store, account_id)?;

        if !account.is_authorized(public_key) {
            return Err(LedgerError::unauthorized(account_id, public_key));
        }

        Ok(account.balance())
    }

    /// Overwrite an account balance
    ///
    /// This is the administrative entry point. It takes no credential and, by
    /// default, no balance floor; callers must gate access to it themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no account exists under `account_id`
    /// - the update floor is enforced and `balance` is negative
    /// - `balance` cannot be stored exactly
    pub fn update_balance<S: StateStore>(
        &self,
        store: &mut S,
        account_id: &str,
        balance: Decimal,
    ) -> Result<(), LedgerError> {
        let mut account = load_account(store, account_id)?;

        if self.config.enforce_update_floor && balance < Decimal::ZERO {
            return Err(LedgerError::invalid_balance(account_id, balance));
        }

        let previous = account.balance();
        account.set_balance(balance);

        let mut writes = WriteSet::new();
        writes.stage(&account)?;
        store.commit(writes)?;

        tracing::debug!(account = account_id, %previous, %balance, "Balance updated");
        Ok(())
    }

    /// Move `amount` from one account to another
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// distinct accounts, positive amount, source exists, destination exists,
    /// key matches the source, source balance covers the amount. Both updated
    /// records are committed together.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `from` and `to` are the same account
    /// - `amount` is zero or negative
    /// - either account does not exist
    /// - `public_key` is not the source account's key
    /// - the source balance is less than `amount`
    /// - the destination balance would overflow
    /// - either resulting balance cannot be stored exactly
    pub fn transfer<S: StateStore>(
        &self,
        store: &mut S,
        from: &str,
        to: &str,
        amount: Decimal,
        public_key: &str,
    ) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::same_account(from));
        }

        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        let from_raw = read_record(store, from)?;
        let to_raw = read_record(store, to)?;

        let mut source = Account::decode(from, &from_raw)?;
        if !source.is_authorized(public_key) {
            return Err(LedgerError::unauthorized(from, public_key));
        }

        let mut destination = Account::decode(to, &to_raw)?;

        if source.balance() < amount {
            return Err(LedgerError::insufficient_balance(
                from,
                source.balance(),
                amount,
            ));
        }

        source.debit(amount)?;
        destination.credit(amount)?;

        let mut writes = WriteSet::new();
        writes.stage(&source)?;
        writes.stage(&destination)?;
        store.commit(writes)?;

        tracing::debug!(from, to, %amount, "Transfer applied");
        Ok(())
    }
}

/// Read the raw record stored under `account_id`
fn read_record<S: StateStore>(store: &S, account_id: &str) -> Result<String, LedgerError> {
    store
        .get_state(account_id)?
        .ok_or_else(|| LedgerError::account_not_found(account_id))
}

fn load_account<S: StateStore>(store: &S, account_id: &str) -> Result<Account, LedgerError> {
    let raw = read_record(store, account_id)?;
    Account::decode(account_id, &raw)
}
