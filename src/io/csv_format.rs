//! CSV format handling for operation scripts and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger operations
//! - Account output serialization
//!
//! # Script Format
//!
//! ```text
//! op,account,counterparty,amount,key
//! create,alice,,100.0,k1
//! create,bob,,0.0,k2
//! transfer,alice,bob,40.0,k1
//! peek_balance,alice,,,k1
//! peek_key,bob,,,
//! update,bob,,12.5,
//! ```

use crate::types::{Account, AccountOperation, LedgerError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the script columns: op, account, counterparty, amount, key.
/// Which of the optional columns are required depends on `op`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub account: String,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub key: Option<String>,
}

/// Treat blank optional fields as absent
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn require(
    field: Option<String>,
    column: &str,
    op: &str,
    account: &str,
) -> Result<String, String> {
    present(field)
        .ok_or_else(|| format!("{} operation on account {} requires {}", op, account, column))
}

fn require_amount(
    field: Option<String>,
    column: &str,
    op: &str,
    account: &str,
) -> Result<Decimal, String> {
    let raw = require(field, column, op, account)?;
    Decimal::from_str(raw.trim()).map_err(|_| {
        format!(
            "Invalid {} '{}' for {} on account {}",
            column, raw, op, account
        )
    })
}

/// Convert a CsvRecord to an AccountOperation
///
/// This function:
/// - Parses the op name (case-insensitive)
/// - Checks that the columns the op needs are present
/// - Parses amounts into Decimal
///
/// Columns an op does not use are ignored.
///
/// # Returns
///
/// Result containing either:
/// - Ok(AccountOperation) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<AccountOperation, String> {
    let op = csv_record.op.trim().to_lowercase();
    let account = csv_record.account.trim().to_string();

    if account.is_empty() {
        return Err(format!("{} operation requires an account", op));
    }

    let operation = match op.as_str() {
        "create" => AccountOperation::Create {
            initial_balance: require_amount(csv_record.amount, "amount", &op, &account)?,
            public_key: require(csv_record.key, "key", &op, &account)?,
            account_id: account,
        },
        "peek_key" => AccountOperation::PeekPublicKey { account_id: account },
        "peek_balance" => AccountOperation::PeekBalance {
            public_key: require(csv_record.key, "key", &op, &account)?,
            account_id: account,
        },
        "update" => AccountOperation::UpdateBalance {
            balance: require_amount(csv_record.amount, "amount", &op, &account)?,
            account_id: account,
        },
        "transfer" => AccountOperation::Transfer {
            to: require(csv_record.counterparty, "counterparty", &op, &account)?,
            amount: require_amount(csv_record.amount, "amount", &op, &account)?,
            public_key: require(csv_record.key, "key", &op, &account)?,
            from: account,
        },
        _ => {
            return Err(format!(
                "Invalid operation: '{}' for account {}",
                csv_record.op, account
            ))
        }
    };

    Ok(operation)
}

/// Write account states to CSV format
///
/// Writes accounts with columns: account, public_key, balance.
/// Accounts are sorted by id for deterministic output and balances are
/// printed with four decimal places.
///
/// # Errors
///
/// Returns `Io` if writing to `output` fails.
pub fn write_accounts_csv(
    accounts: &[Account],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "public_key", "balance"])
        .map_err(|e| LedgerError::Io {
            message: format!("Failed to write CSV header: {}", e),
        })?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.account_id().cmp(b.account_id()));

    for account in sorted_accounts {
        writer
            .write_record([
                account.account_id().to_string(),
                account.public_key().to_string(),
                format!("{:.4}", account.balance()),
            ])
            .map_err(|e| LedgerError::Io {
                message: format!("Failed to write account record: {}", e),
            })?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(
        op: &str,
        account: &str,
        counterparty: Option<&str>,
        amount: Option<&str>,
        key: Option<&str>,
    ) -> CsvRecord {
        CsvRecord {
            op: op.to_string(),
            account: account.to_string(),
            counterparty: counterparty.map(str::to_string),
            amount: amount.map(str::to_string),
            key: key.map(str::to_string),
        }
    }

    #[rstest]
    #[case::create(
        record("create", "alice", None, Some("100.0"), Some("k1")),
        AccountOperation::Create {
            account_id: "alice".to_string(),
            public_key: "k1".to_string(),
            initial_balance: Decimal::new(1000, 1),
        }
    )]
    #[case::create_upper_case(
        record("CREATE", "alice", None, Some("1"), Some("k1")),
        AccountOperation::Create {
            account_id: "alice".to_string(),
            public_key: "k1".to_string(),
            initial_balance: Decimal::ONE,
        }
    )]
    #[case::peek_key(
        record("peek_key", "bob", None, None, None),
        AccountOperation::PeekPublicKey { account_id: "bob".to_string() }
    )]
    #[case::peek_balance(
        record("peek_balance", "bob", None, None, Some("k2")),
        AccountOperation::PeekBalance {
            account_id: "bob".to_string(),
            public_key: "k2".to_string(),
        }
    )]
    #[case::update(
        record("update", "bob", None, Some("-3.5"), None),
        AccountOperation::UpdateBalance {
            account_id: "bob".to_string(),
            balance: Decimal::new(-35, 1),
        }
    )]
    #[case::transfer(
        record("transfer", "alice", Some("bob"), Some("40.0"), Some("k1")),
        AccountOperation::Transfer {
            from: "alice".to_string(),
            to: "bob".to_string(),
            amount: Decimal::new(400, 1),
            public_key: "k1".to_string(),
        }
    )]
    #[case::unused_columns_ignored(
        record("peek_key", "bob", Some("x"), Some("1"), Some("k")),
        AccountOperation::PeekPublicKey { account_id: "bob".to_string() }
    )]
    fn test_convert_csv_record_valid(#[case] csv_record: CsvRecord, #[case] expected: AccountOperation) {
        assert_eq!(convert_csv_record(csv_record), Ok(expected));
    }

    #[rstest]
    #[case::unknown_op(record("delete", "alice", None, None, None), "Invalid operation")]
    #[case::empty_account(record("peek_key", "  ", None, None, None), "requires an account")]
    #[case::create_without_key(record("create", "alice", None, Some("1"), None), "requires key")]
    #[case::create_without_amount(record("create", "alice", None, None, Some("k1")), "requires amount")]
    #[case::blank_amount(record("update", "alice", None, Some("  "), None), "requires amount")]
    #[case::bad_amount(record("update", "alice", None, Some("lots"), None), "Invalid amount 'lots'")]
    #[case::transfer_without_counterparty(record("transfer", "alice", None, Some("1"), Some("k1")), "requires counterparty")]
    #[case::peek_balance_without_key(record("peek_balance", "alice", None, None, None), "requires key")]
    fn test_convert_csv_record_invalid(#[case] csv_record: CsvRecord, #[case] message: &str) {
        let result = convert_csv_record(csv_record);

        let error = result.unwrap_err();
        assert!(error.contains(message), "unexpected error: {}", error);
    }

    #[test]
    fn test_write_accounts_csv_sorted_with_four_decimals() {
        let accounts = vec![
            Account::new("bob", "k2", Decimal::new(400, 1)),
            Account::new("alice", "k1", Decimal::new(60, 0)),
        ];
        let mut output = Vec::new();

        write_accounts_csv(&accounts, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,public_key,balance\nalice,k1,60.0000\nbob,k2,40.0000\n"
        );
    }

    #[test]
    fn test_write_accounts_csv_empty() {
        let mut output = Vec::new();

        write_accounts_csv(&[], &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "account,public_key,balance\n");
    }
}
