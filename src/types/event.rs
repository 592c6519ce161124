//! Notification events emitted by successful ledger calls

use crate::types::account::{AccountId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;

/// Exactly one event is recorded per successful mutating call.
///
/// Payloads always carry the account id and the key numeric outcome of
/// the operation so observers can refresh without re-querying.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    AccountRegistered {
        id: AccountId,
        first_name: String,
        last_name: String,
    },
    DepositRecorded {
        id: AccountId,
        amount: Decimal,
    },
    DuesSettled {
        id: AccountId,
        amount_paid: Decimal,
    },
    FundsWithdrawn {
        id: AccountId,
        amount: Decimal,
    },
    PickupRecorded {
        id: AccountId,
        start: Timestamp,
    },
    DropoffRecorded {
        id: AccountId,
        end: Timestamp,
        due_increment: Decimal,
    },
    HoldPlaced {
        id: AccountId,
        reason: String,
    },
    HoldReleased {
        id: AccountId,
    },
}

impl LedgerEvent {
    /// Account the event refers to
    pub fn account(&self) -> &AccountId {
        match self {
            LedgerEvent::AccountRegistered { id, .. }
            | LedgerEvent::DepositRecorded { id, .. }
            | LedgerEvent::DuesSettled { id, .. }
            | LedgerEvent::FundsWithdrawn { id, .. }
            | LedgerEvent::PickupRecorded { id, .. }
            | LedgerEvent::DropoffRecorded { id, .. }
            | LedgerEvent::HoldPlaced { id, .. }
            | LedgerEvent::HoldReleased { id } => id,
        }
    }
}
