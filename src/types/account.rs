//! Account-related types for the rental ledger
//!
//! This module defines the renter identifier, the Account record and the
//! snapshot used for administrative backfill registration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix time in whole seconds
pub type Timestamp = u64;

/// Address-like identifier of a renter (and of the owner)
///
/// Identifiers are compared verbatim. An empty string, a string with
/// surrounding whitespace or the all-zero address (`0x000...0`) is not a
/// well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier can name an account
    pub fn is_well_formed(&self) -> bool {
        let id = self.0.as_str();
        if id.is_empty() || id.trim() != id {
            return false;
        }
        // The zero address is the "null" identifier
        match id.strip_prefix("0x").or_else(|| id.strip_prefix("0X"))
        {
            Some(hex) => !hex.is_empty() && !hex.chars().all(|c| c == '0'),
            None => true,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        AccountId::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        AccountId(id)
    }
}

/// Verified identity of whoever submitted a call
///
/// Threaded explicitly through every mutating entry point so that the
/// access check never depends on ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(AccountId);

impl CallerIdentity {
    pub fn new(id: impl Into<AccountId>) -> Self {
        CallerIdentity(id.into())
    }

    pub fn id(&self) -> &AccountId {
        &self.0
    }
}

impl From<AccountId> for CallerIdentity {
    fn from(id: AccountId) -> Self {
        CallerIdentity(id)
    }
}

/// Renter account state
///
/// `can_rent` is stored but always derived from `active`, `due` and
/// `hold_reason` after each mutation (see [`Account::refresh_eligibility`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// External identifier, immutable once created
    pub id: AccountId,

    pub first_name: String,
    pub last_name: String,

    /// True when the account has no outstanding dues, is not mid-rental
    /// and carries no administrative hold
    pub can_rent: bool,

    /// True strictly between a pickup and the matching dropoff
    pub active: bool,

    /// Funds custodied by the ledger on behalf of this renter
    pub balance: Decimal,

    /// Amount owed for the most recently completed rental
    pub due: Decimal,

    /// Set on pickup; meaningful only while `active`
    pub start: Option<Timestamp>,

    /// Set on dropoff
    pub end: Option<Timestamp>,

    /// Running total of completed-rental minutes (rounded down per rental)
    pub accumulated_minutes: u64,

    /// Administrative hold blocking pickups, if any
    pub hold_reason: Option<String>,
}

impl Account {
    /// Create a new idle account with zero balances
    pub fn new(id: AccountId, first_name: String, last_name: String) -> Self {
        Account {
            id,
            first_name,
            last_name,
            can_rent: true,
            active: false,
            balance: Decimal::ZERO,
            due: Decimal::ZERO,
            start: None,
            end: None,
            accumulated_minutes: 0,
            hold_reason: None,
        }
    }

    /// Re-derive `can_rent` from the rest of the record
    pub fn refresh_eligibility(&mut self) {
        self.can_rent = !self.active && self.due.is_zero() && self.hold_reason.is_none();
    }

    /// Whether an administrative hold is in place
    pub fn is_on_hold(&self) -> bool {
        self.hold_reason.is_some()
    }
}

/// Initial values for an administratively backfilled account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSnapshot {
    pub balance: Decimal,
    pub due: Decimal,
    pub active: bool,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub accumulated_minutes: u64,
    pub hold_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::hex_address("0x70997970C51812dc3A010C7d01b50e0d17dc79C8", true)]
    #[case::plain_name("alice", true)]
    #[case::empty("", false)]
    #[case::blank("   ", false)]
    #[case::zero_address("0x0000000000000000000000000000000000000000", false)]
    #[case::bare_prefix("0x", false)]
    #[case::leading_space(" alice", false)]
    #[case::trailing_newline("alice\n", false)]
    fn test_account_id_well_formed(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(AccountId::from(raw).is_well_formed(), expected);
    }

    #[test]
    fn test_new_account_is_idle_and_eligible() {
        let account = Account::new("alice".into(), "Alice".into(), "Doe".into());

        assert!(account.can_rent);
        assert!(!account.active);
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.due, Decimal::ZERO);
        assert_eq!(account.start, None);
        assert_eq!(account.end, None);
        assert_eq!(account.accumulated_minutes, 0);
    }

    #[rstest]
    #[case::idle_clear(false, Decimal::ZERO, None, true)]
    #[case::renting(true, Decimal::ZERO, None, false)]
    #[case::owes(false, Decimal::new(3, 3), None, false)]
    #[case::held(false, Decimal::ZERO, Some("license check"), false)]
    fn test_refresh_eligibility(
        #[case] active: bool,
        #[case] due: Decimal,
        #[case] hold: Option<&str>,
        #[case] expected: bool,
    ) {
        let mut account = Account::new("alice".into(), "Alice".into(), "Doe".into());
        account.active = active;
        account.due = due;
        account.hold_reason = hold.map(str::to_string);

        account.refresh_eligibility();

        assert_eq!(account.can_rent, expected);
    }
}
