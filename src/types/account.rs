//! Account entity for the account ledger
//!
//! This module defines the `Account` record stored under each account key and
//! its encode/decode contract with the state store.
//!
//! # Record Format
//!
//! An account is stored as a JSON object with exactly three fields:
//!
//! ```json
//! {"accountId":"alice","publicKey":"k1","balance":100.0}
//! ```
//!
//! The balance is held as a `Decimal` in memory and written as a JSON
//! floating-point number. Decoding rejects unknown fields, missing fields and
//! wrongly-typed fields. This field set is the only record layout; a layout
//! change needs a new type rather than optional fields on this one.

use super::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account identifier, doubles as the state-store key
pub type AccountId = String;

/// Authorization credential bound to an account at creation
pub type PublicKey = String;

/// A single ledger account
///
/// Identity fields are fixed at construction. Only the balance can change,
/// and only through the ledger operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Account {
    account_id: AccountId,

    public_key: PublicKey,

    #[serde(with = "balance_format")]
    balance: Decimal,
}

/// Wire format for balances: a JSON number, never a string
mod balance_format {
    use super::*;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value =
            to_f64(value).ok_or_else(|| S::Error::custom("balance is not a finite number"))?;
        serializer.serialize_f64(value)
    }

    fn to_f64(value: &Decimal) -> Option<f64> {
        f64::from_str(&value.to_string())
            .ok()
            .filter(|f| f.is_finite())
    }

    fn from_f64(value: f64) -> Option<Decimal> {
        Decimal::from_str(&value.to_string()).ok()
    }

    /// Whether `value` survives the trip through a JSON number unchanged
    pub fn is_exact(value: &Decimal) -> bool {
        to_f64(value).and_then(from_f64) == Some(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(D::Error::custom("balance must be a finite number"));
        }
        from_f64(value).ok_or_else(|| D::Error::custom("balance is outside the decimal range"))
    }
}

impl Account {
    /// Create an account record
    ///
    /// No validation is performed here; the ledger decides which values are
    /// acceptable before a record is built.
    pub fn new(
        account_id: impl Into<AccountId>,
        public_key: impl Into<PublicKey>,
        balance: Decimal,
    ) -> Self {
        Account {
            account_id: account_id.into(),
            public_key: public_key.into(),
            balance,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    /// Check whether `public_key` is the credential bound to this account
    pub fn is_authorized(&self, public_key: &str) -> bool {
        self.public_key == public_key
    }

    /// Add `amount` to the balance
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the new balance cannot be represented.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", &self.account_id))?;
        Ok(())
    }

    /// Subtract `amount` from the balance
    ///
    /// The balance floor is the caller's concern; this only guards the
    /// arithmetic itself.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the new balance cannot be represented.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", &self.account_id))?;
        Ok(())
    }

    /// Encode the account into its stored string representation
    ///
    /// # Errors
    ///
    /// Returns `UnrepresentableBalance` if the balance would not read back
    /// exactly, so a record is never written that decodes to a different
    /// value or not at all.
    pub fn encode(&self) -> Result<String, LedgerError> {
        if !balance_format::is_exact(&self.balance) {
            return Err(LedgerError::unrepresentable_balance(
                &self.account_id,
                self.balance,
            ));
        }

        serde_json::to_string(self)
            .map_err(|e| LedgerError::malformed_record(&self.account_id, &e.to_string()))
    }

    /// Decode an account from the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` if the value is not a JSON object carrying
    /// exactly `accountId`, `publicKey` and `balance` with the right types, or
    /// if the decoded `accountId` is not the key it was stored under.
    pub fn decode(key: &str, raw: &str) -> Result<Self, LedgerError> {
        let account: Account = serde_json::from_str(raw)
            .map_err(|e| LedgerError::malformed_record(key, &e.to_string()))?;

        if account.account_id != key {
            return Err(LedgerError::malformed_record(
                key,
                &format!("record belongs to account '{}'", account.account_id),
            ));
        }

        Ok(account)
    }
}
