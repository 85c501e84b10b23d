//! Ledger policy configuration
//!
//! The ledger's core rules (no self-transfers, positive transfer amounts,
//! key-checked reads and transfers, no overdrafts) are fixed. Two entry points
//! are looser than `transfer` and their strictness is decided here:
//!
//! - `create_account` rejects a negative initial balance unless
//!   `allow_negative_initial_balance` is set.
//! - `update_balance` is the administrative path: it never asks for a key.
//!   With `enforce_update_floor` set it also refuses negative balances.

/// Policy switches for the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerConfig {
    /// Accept `create_account` calls with a negative initial balance
    pub allow_negative_initial_balance: bool,

    /// Reject `update_balance` calls that would set a negative balance
    pub enforce_update_floor: bool,
}

impl LedgerConfig {
    /// Create a config with the default policy
    ///
    /// Negative initial balances are rejected; administrative updates are
    /// unchecked.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_negative_initial_balance(mut self, allow: bool) -> Self {
        self.allow_negative_initial_balance = allow;
        self
    }

    pub fn with_update_floor(mut self, enforce: bool) -> Self {
        self.enforce_update_floor = enforce;
        self
    }
}
