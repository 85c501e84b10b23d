//! Account Ledger CLI
//!
//! Command-line interface for applying ledger operations from CSV scripts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > accounts.csv
//! cargo run -- --state ledger.json operations.csv > accounts.csv
//! RUST_LOG=debug cargo run -- operations.csv > accounts.csv
//! ```
//!
//! The program reads operations from the input CSV file, applies them to the
//! ledger in order, and writes the final account states to stdout. Logs go to
//! stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (rejected operations do not change the exit code)
//! - 1: Error (file not found, unreadable snapshot, output failure, etc.)

use rust_account_ledger::cli;
use rust_account_ledger::driver::ScriptDriver;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let mut driver = ScriptDriver::new(args.to_ledger_config());
    if let Some(state_file) = &args.state_file {
        driver = driver.with_state_path(state_file);
    }

    let mut output = std::io::stdout();
    if let Err(e) = driver.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
