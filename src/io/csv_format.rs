//! CSV format handling for call records and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger calls
//! - Account output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, AccountId, CallerIdentity, LedgerCall, Operation, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// op, caller, account, amount, first_name, last_name, at
///
/// Only `op`, `caller` and `account` are always present; the rest depend on
/// the operation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub caller: String,
    pub account: String,
    pub amount: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub at: Option<Timestamp>,
}

fn parse_operation(op: &str) -> Option<Operation> {
    let normalized: String = op
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();

    let operation = match normalized.as_str() {
        "register" => Operation::Register,
        "deposit" => Operation::Deposit,
        "pickup" => Operation::PickUp,
        "dropoff" => Operation::DropOff,
        "paydues" => Operation::PayDues,
        "withdraw" => Operation::Withdraw,
        "hold" => Operation::Hold,
        "release" => Operation::Release,
        _ => return None,
    };
    Some(operation)
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// Convert a CsvRecord to a LedgerCall
///
/// Parses the operation name (case-insensitive, `_`/`-` ignored) and the
/// amount. A deposit without an amount is rejected here; everything else
/// about the call is left to the ledger to judge.
///
/// # Returns
///
/// - Ok(LedgerCall) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCall, String> {
    let operation = parse_operation(&csv_record.op).ok_or_else(|| {
        format!(
            "Invalid operation: '{}' for account {}",
            csv_record.op, csv_record.account
        )
    })?;

    let amount = match non_empty(csv_record.amount) {
        Some(amount_str) => Some(Decimal::from_str(amount_str.trim()).map_err(|_| {
            format!(
                "Invalid amount '{}' for account {}",
                amount_str, csv_record.account
            )
        })?),
        None => None,
    };

    if operation == Operation::Deposit && amount.is_none() {
        return Err(format!(
            "{} call for account {} requires an amount",
            operation, csv_record.account
        ));
    }

    Ok(LedgerCall {
        operation,
        caller: CallerIdentity::new(csv_record.caller),
        account: AccountId::new(csv_record.account),
        amount,
        first_name: non_empty(csv_record.first_name),
        last_name: non_empty(csv_record.last_name),
        at: csv_record.at,
    })
}

/// Write account states to CSV format
///
/// Columns: account, first_name, last_name, balance, due, can_rent, active,
/// total_minutes. Accounts are sorted by id for deterministic output and
/// decimals are written in their shortest form.
pub fn write_accounts_csv(accounts: &[&Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "account",
            "first_name",
            "last_name",
            "balance",
            "due",
            "can_rent",
            "active",
            "total_minutes",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.first_name.clone(),
                account.last_name.clone(),
                account.balance.normalize().to_string(),
                account.due.normalize().to_string(),
                account.can_rent.to_string(),
                account.active.to_string(),
                account.accumulated_minutes.to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(op: &str, amount: Option<&str>) -> CsvRecord {
        CsvRecord {
            op: op.to_string(),
            caller: "alice".to_string(),
            account: "alice".to_string(),
            amount: amount.map(|s| s.to_string()),
            first_name: None,
            last_name: None,
            at: Some(100),
        }
    }

    #[rstest]
    #[case("register", Operation::Register)]
    #[case("deposit", Operation::Deposit)]
    #[case("pickup", Operation::PickUp)]
    #[case("pick_up", Operation::PickUp)]
    #[case("DropOff", Operation::DropOff)]
    #[case("pay-dues", Operation::PayDues)]
    #[case("WITHDRAW", Operation::Withdraw)]
    #[case("hold", Operation::Hold)]
    #[case("release", Operation::Release)]
    fn test_convert_csv_record_operations(#[case] op: &str, #[case] expected: Operation) {
        let amount = (expected == Operation::Deposit).then_some("1");

        let call = convert_csv_record(record(op, amount)).unwrap();

        assert_eq!(call.operation, expected);
        assert_eq!(call.caller, CallerIdentity::new("alice"));
        assert_eq!(call.account, AccountId::from("alice"));
        assert_eq!(call.at, Some(100));
    }

    #[test]
    fn test_convert_register_record() {
        let csv_record = CsvRecord {
            op: "register".to_string(),
            caller: "owner".to_string(),
            account: "alice".to_string(),
            amount: Some("".to_string()),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            at: None,
        };

        let call = convert_csv_record(csv_record).unwrap();

        assert_eq!(call.amount, None);
        assert_eq!(call.first_name.as_deref(), Some("John"));
        assert_eq!(call.last_name.as_deref(), Some("Doe"));
        assert_eq!(call.at, None);
    }

    #[test]
    fn test_blank_names_become_none() {
        let mut csv_record = record("register", None);
        csv_record.first_name = Some("   ".to_string());

        let call = convert_csv_record(csv_record).unwrap();

        assert_eq!(call.first_name, None);
    }

    #[rstest]
    #[case::invalid_operation("rent", Some("1"), "Invalid operation")]
    #[case::deposit_missing_amount("deposit", None, "requires an amount")]
    #[case::deposit_blank_amount("deposit", Some("  "), "requires an amount")]
    #[case::invalid_amount("deposit", Some("one"), "Invalid amount")]
    fn test_convert_csv_record_errors(
        #[case] op: &str,
        #[case] amount: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let result = convert_csv_record(record(op, amount));

        assert!(result.unwrap_err().contains(expected_error));
    }

    #[rstest]
    #[case("  0.01  ", Decimal::new(1, 2))]
    #[case("0.001", Decimal::new(1, 3))]
    #[case("-0.5", Decimal::new(-5, 1))]
    fn test_convert_csv_record_amount_parsing(#[case] amount: &str, #[case] expected: Decimal) {
        let call = convert_csv_record(record("deposit", Some(amount))).unwrap();

        assert_eq!(call.amount, Some(expected));
    }

    fn account(id: &str, balance: Decimal, due: Decimal) -> Account {
        let mut account = Account::new(id.into(), "John".to_string(), "Doe".to_string());
        account.balance = balance;
        account.due = due;
        account.refresh_eligibility();
        account
    }

    #[test]
    fn test_write_accounts_csv_sorted_and_normalized() {
        let bob = account("bob", Decimal::new(7000, 6), Decimal::new(3, 3));
        let alice = account("alice", Decimal::new(1, 2), Decimal::ZERO);
        let mut output = Vec::new();

        write_accounts_csv(&[&bob, &alice], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,first_name,last_name,balance,due,can_rent,active,total_minutes\n\
             alice,John,Doe,0.01,0,true,false,0\n\
             bob,John,Doe,0.007,0.003,false,false,0\n"
        );
    }

    #[test]
    fn test_write_accounts_csv_empty() {
        let mut output = Vec::new();

        write_accounts_csv(&[], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,first_name,last_name,balance,due,can_rent,active,total_minutes\n"
        );
    }
}
