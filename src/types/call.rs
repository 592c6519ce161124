//! Ledger call types
//!
//! A [`LedgerCall`] is one signed request submitted by the external
//! collaborator: who is calling, what operation, on which account, and with
//! which arguments. Calls are what the replay pipeline feeds into the ledger.

use crate::types::account::{AccountId, CallerIdentity, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutating operations a caller can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Owner registers a renter (requires first and last name)
    Register,

    /// Renter adds funds to their own balance (requires amount)
    Deposit,

    /// Renter starts a rental
    PickUp,

    /// Renter ends a rental, accruing dues
    DropOff,

    /// Renter settles outstanding dues from their balance
    PayDues,

    /// Renter takes out their whole balance
    Withdraw,

    /// Owner places an administrative hold (reason carried in `first_name`)
    Hold,

    /// Owner releases an administrative hold
    Release,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Deposit => "deposit",
            Operation::PickUp => "pickup",
            Operation::DropOff => "dropoff",
            Operation::PayDues => "paydues",
            Operation::Withdraw => "withdraw",
            Operation::Hold => "hold",
            Operation::Release => "release",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call as submitted to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerCall {
    pub operation: Operation,

    /// Verified identity of the submitter
    pub caller: CallerIdentity,

    /// Target account
    pub account: AccountId,

    /// Required for deposits
    pub amount: Option<Decimal>,

    /// Required for registration; reused as the hold reason for holds
    pub first_name: Option<String>,

    /// Required for registration
    pub last_name: Option<String>,

    /// Time at which the call was mined, when replaying a log
    pub at: Option<Timestamp>,
}
