//! Account registry
//!
//! This module provides the `AccountRegistry` which owns the account table.
//!
//! The registry is responsible for:
//! - Validating new registrations (identifier, uniqueness, names)
//! - Storing accounts (never deleted)
//! - Looking accounts up for the treasury and lifecycle operations
//! - Providing sorted account listings for output

use crate::types::{Account, AccountId, LedgerError};
use std::collections::HashMap;

/// Table of all registered renter accounts
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: HashMap<AccountId, Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        AccountRegistry {
            accounts: HashMap::new(),
        }
    }

    /// Validate a registration request without touching the table
    ///
    /// Checks run in order: identifier shape, uniqueness, first name, last name.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if `id` is empty or the null address
    /// - `DuplicateAccount` if `id` is already registered
    /// - `EmptyName` if either name is blank
    pub fn validate_new(
        &self,
        id: &AccountId,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), LedgerError> {
        if !id.is_well_formed() {
            return Err(LedgerError::InvalidIdentifier { id: id.clone() });
        }

        if self.accounts.contains_key(id) {
            return Err(LedgerError::DuplicateAccount { id: id.clone() });
        }

        if first_name.trim().is_empty() {
            return Err(LedgerError::empty_name(id, "First name"));
        }

        if last_name.trim().is_empty() {
            return Err(LedgerError::empty_name(id, "Last name"));
        }

        Ok(())
    }

    /// Store a new account
    ///
    /// Callers validate with [`AccountRegistry::validate_new`] first; inserting
    /// an existing id is rejected rather than overwriting it.
    pub fn insert(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::DuplicateAccount { id: account.id });
        }
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    pub fn get(&self, id: &AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    pub fn get_mut(&mut self, id: &AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Get all accounts sorted by id
    ///
    /// The table itself has no ordering; sorting gives deterministic output.
    pub fn all_sorted(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }

    /// Iterate accounts in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}
