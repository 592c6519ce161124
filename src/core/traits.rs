//! Core traits at the ledger's seams
//!
//! These abstractions keep the ledger free of ambient state: time comes from
//! a [`Clock`], outbound value transfers go through a [`Payout`], and anything
//! observing the ledger mid-call only gets a [`LedgerView`].

use crate::types::{Account, AccountId, LedgerError, Timestamp};
use rust_decimal::Decimal;

/// Source of the current time for pickups and dropoffs
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Read-only access to ledger state
///
/// Every query fails only with [`LedgerError::AccountNotFound`].
pub trait LedgerView {
    fn is_eligible(&self, id: &AccountId) -> Result<bool, LedgerError>;

    fn balance_of(&self, id: &AccountId) -> Result<Decimal, LedgerError>;

    fn due_of(&self, id: &AccountId) -> Result<Decimal, LedgerError>;

    fn total_duration_of(&self, id: &AccountId) -> Result<u64, LedgerError>;

    fn account(&self, id: &AccountId) -> Result<&Account, LedgerError>;

    /// Sum of all balances custodied by the ledger
    fn total_held(&self) -> Decimal;
}

/// Outbound value transfer used by withdrawals
///
/// `send` runs after the withdrawal debit is committed, so `view` already
/// shows the recipient's balance at zero. Returning an error reverts the
/// whole withdrawal.
pub trait Payout {
    fn send(
        &mut self,
        view: &dyn LedgerView,
        recipient: &AccountId,
        amount: Decimal,
    ) -> Result<(), String>;
}
