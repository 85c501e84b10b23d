use crate::core::LedgerConfig;
use clap::Parser;
use std::path::PathBuf;

/// Apply account ledger operations from a CSV script
#[derive(Parser, Debug)]
#[command(name = "account-ledger")]
#[command(about = "Apply account ledger operations from a CSV script", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger operations
    #[arg(value_name = "INPUT", help = "Path to the operation script CSV file")]
    pub input_file: PathBuf,

    /// State snapshot to load before and save after the run
    #[arg(
        long = "state",
        value_name = "FILE",
        help = "JSON state snapshot to load before the run and save after it"
    )]
    pub state_file: Option<PathBuf>,

    /// Accept negative initial balances on account creation
    #[arg(
        long = "allow-negative-initial-balance",
        help = "Accept create operations with a negative initial balance"
    )]
    pub allow_negative_initial_balance: bool,

    /// Reject administrative updates that set a negative balance
    #[arg(
        long = "enforce-update-floor",
        help = "Reject update operations that would set a negative balance"
    )]
    pub enforce_update_floor: bool,
}

impl CliArgs {
    /// Create a LedgerConfig from CLI arguments
    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new()
            .with_negative_initial_balance(self.allow_negative_initial_balance)
            .with_update_floor(self.enforce_update_floor)
    }
}
