//! Error types for the rental ledger
//!
//! This module defines all error types that can occur while executing ledger
//! calls or replaying a call log.
//!
//! # Error Categories
//!
//! - **Access errors**: the caller is not allowed to perform the call
//! - **Registry errors**: invalid identifiers, duplicate accounts, blank names
//! - **Treasury errors**: non-positive amounts, insufficient balance, payout failures
//! - **Lifecycle errors**: pickup/dropoff preconditions
//! - **Replay errors**: file I/O and CSV parsing (see [`ReplayError`])
//!
//! Every [`LedgerError`] is terminal for the current call only. The ledger is
//! left exactly as it was before the call.

use crate::types::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure of a single ledger call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Caller identity does not satisfy the operation's access class
    #[error("Caller {caller} is not authorized to {operation} account {account}")]
    Unauthorized {
        caller: AccountId,
        account: AccountId,
        operation: String,
    },

    /// Identifier is empty or the null address
    #[error("Invalid account identifier '{id}'")]
    InvalidIdentifier { id: AccountId },

    #[error("Account {id} is already registered")]
    DuplicateAccount { id: AccountId },

    #[error("{field} cannot be empty for account {id}")]
    EmptyName { id: AccountId, field: String },

    #[error("Account {id} not found")]
    AccountNotFound { id: AccountId },

    #[error("Amount {amount} for account {id} must be greater than zero")]
    NonPositiveAmount { id: AccountId, amount: Decimal },

    #[error("Insufficient balance for account {id}: balance {balance}, required {required}")]
    InsufficientBalance {
        id: AccountId,
        balance: Decimal,
        required: Decimal,
    },

    #[error("Account {id} is already renting")]
    AlreadyRenting { id: AccountId },

    #[error("Account {id} is not renting")]
    NotRenting { id: AccountId },

    /// Pickup attempted while a previous rental is unpaid
    #[error("Account {id} has outstanding dues of {due}")]
    DuesOutstanding { id: AccountId, due: Decimal },

    /// Pickup blocked for a reason other than dues
    #[error("Account {id} is not eligible to rent{}", reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default())]
    NotEligible {
        id: AccountId,
        reason: Option<String>,
    },

    #[error("Insufficient deposit for account {id}: balance {balance}, minimum {minimum}")]
    InsufficientDeposit {
        id: AccountId,
        balance: Decimal,
        minimum: Decimal,
    },

    #[error("Account {id} has nothing to pay")]
    NoOutstandingDue { id: AccountId },

    /// Withdrawal attempted while dues are unpaid
    #[error("Account {id} must settle dues of {due} before withdrawing")]
    OutstandingDue { id: AccountId, due: Decimal },

    #[error("Account {id} cannot withdraw while a rental is in progress")]
    RentalInProgress { id: AccountId },

    #[error("Arithmetic overflow in {operation} for account {id}")]
    ArithmeticOverflow { operation: String, id: AccountId },

    #[error("Arithmetic underflow in {operation} for account {id}")]
    ArithmeticUnderflow { operation: String, id: AccountId },

    /// The payout primitive refused the transfer; the withdrawal was reverted
    #[error("Transfer of {amount} to {id} failed: {message}")]
    TransferFailed {
        id: AccountId,
        amount: Decimal,
        message: String,
    },

    /// Backfill snapshot would break a ledger invariant
    #[error("Invalid backfill for account {id}: {reason}")]
    InvalidBackfill { id: AccountId, reason: String },

    #[error("Hold reason for account {id} cannot be empty")]
    InvalidHoldReason { id: AccountId },

    #[error("Account {id} has no administrative hold")]
    NoHold { id: AccountId },

    /// A replayed call lacks a field its operation requires
    #[error("{operation} on account {id} requires {field}")]
    MissingArgument {
        operation: String,
        id: AccountId,
        field: String,
    },
}

impl LedgerError {
    pub fn unauthorized(caller: &AccountId, account: &AccountId, operation: &str) -> Self {
        LedgerError::Unauthorized {
            caller: caller.clone(),
            account: account.clone(),
            operation: operation.to_string(),
        }
    }

    pub fn account_not_found(id: &AccountId) -> Self {
        LedgerError::AccountNotFound { id: id.clone() }
    }

    pub fn empty_name(id: &AccountId, field: &str) -> Self {
        LedgerError::EmptyName {
            id: id.clone(),
            field: field.to_string(),
        }
    }

    pub fn insufficient_balance(id: &AccountId, balance: Decimal, required: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            id: id.clone(),
            balance,
            required,
        }
    }

    pub fn arithmetic_overflow(operation: &str, id: &AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            id: id.clone(),
        }
    }

    pub fn arithmetic_underflow(operation: &str, id: &AccountId) -> Self {
        LedgerError::ArithmeticUnderflow {
            operation: operation.to_string(),
            id: id.clone(),
        }
    }

    pub fn invalid_backfill(id: &AccountId, reason: &str) -> Self {
        LedgerError::InvalidBackfill {
            id: id.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_argument(operation: &str, id: &AccountId, field: &str) -> Self {
        LedgerError::MissingArgument {
            operation: operation.to_string(),
            id: id.clone(),
            field: field.to_string(),
        }
    }
}

/// Fatal error of a replay run
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {message}")]
    IoError { message: String },

    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },

    /// Async runtime could not be built or a task died
    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl From<std::io::Error> for ReplayError {
    fn from(error: std::io::Error) -> Self {
        ReplayError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReplayError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReplayError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn alice() -> AccountId {
        AccountId::from("alice")
    }

    #[rstest]
    #[case::unauthorized(
        LedgerError::unauthorized(&AccountId::from("mallory"), &alice(), "withdraw"),
        "Caller mallory is not authorized to withdraw account alice"
    )]
    #[case::empty_name(
        LedgerError::empty_name(&alice(), "First name"),
        "First name cannot be empty for account alice"
    )]
    #[case::insufficient_balance(
        LedgerError::insufficient_balance(&alice(), Decimal::new(1, 3), Decimal::new(3, 3)),
        "Insufficient balance for account alice: balance 0.001, required 0.003"
    )]
    #[case::not_eligible_with_reason(
        LedgerError::NotEligible { id: alice(), reason: Some("license check".to_string()) },
        "Account alice is not eligible to rent: license check"
    )]
    #[case::not_eligible_without_reason(
        LedgerError::NotEligible { id: alice(), reason: None },
        "Account alice is not eligible to rent"
    )]
    #[case::outstanding_due(
        LedgerError::OutstandingDue { id: alice(), due: Decimal::new(3, 3) },
        "Account alice must settle dues of 0.003 before withdrawing"
    )]
    #[case::missing_argument(
        LedgerError::missing_argument("deposit", &alice(), "amount"),
        "deposit on account alice requires amount"
    )]
    fn test_ledger_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::parse_error_with_line(
        ReplayError::ParseError { line: Some(7), message: "bad field".to_string() },
        "CSV parse error at line 7: bad field"
    )]
    #[case::parse_error_without_line(
        ReplayError::ParseError { line: None, message: "bad field".to_string() },
        "CSV parse error: bad field"
    )]
    #[case::file_not_found(
        ReplayError::FileNotFound { path: "calls.csv".to_string() },
        "File not found: calls.csv"
    )]
    fn test_replay_error_display(#[case] error: ReplayError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ReplayError = io_error.into();
        assert!(matches!(error, ReplayError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
