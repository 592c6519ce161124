//! Treasury
//!
//! Tracks the total value custodied by the ledger and moves value in and
//! out of individual accounts. Every balance change goes through
//! [`Treasury::credit`] or [`Treasury::debit`], which compute both the new
//! account balance and the new total before writing either, so the two
//! can never drift apart.

use crate::types::{Account, LedgerError};
use rust_decimal::Decimal;

/// Custodied value across all accounts
#[derive(Debug, Default)]
pub struct Treasury {
    total_held: Decimal,
}

impl Treasury {
    pub fn new() -> Self {
        Treasury {
            total_held: Decimal::ZERO,
        }
    }

    /// Sum of all account balances
    pub fn total_held(&self) -> Decimal {
        self.total_held
    }

    /// Add `amount` to an account balance and to the total
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if either sum overflows; nothing is written.
    pub fn credit(
        &mut self,
        account: &mut Account,
        amount: Decimal,
        operation: &str,
    ) -> Result<Decimal, LedgerError> {
        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, &account.id))?;

        let new_total = self
            .total_held
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, &account.id))?;

        account.balance = new_balance;
        self.total_held = new_total;

        Ok(new_balance)
    }

    /// Remove `amount` from an account balance and from the total
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance` if the balance is below `amount`
    /// - `ArithmeticUnderflow` if the total would go negative
    pub fn debit(
        &mut self,
        account: &mut Account,
        amount: Decimal,
        operation: &str,
    ) -> Result<Decimal, LedgerError> {
        if account.balance < amount {
            return Err(LedgerError::insufficient_balance(
                &account.id,
                account.balance,
                amount,
            ));
        }

        let new_balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_underflow(operation, &account.id))?;

        let new_total = self
            .total_held
            .checked_sub(amount)
            .filter(|total| *total >= Decimal::ZERO)
            .ok_or_else(|| LedgerError::arithmetic_underflow(operation, &account.id))?;

        account.balance = new_balance;
        self.total_held = new_total;

        Ok(new_balance)
    }

    /// Record a renter deposit
    ///
    /// # Errors
    ///
    /// `NonPositiveAmount` when `amount <= 0`.
    pub fn deposit(&mut self, account: &mut Account, amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                id: account.id.clone(),
                amount,
            });
        }

        self.credit(account, amount, "deposit")
    }

    /// Pay the outstanding due out of the account balance
    ///
    /// Returns the amount paid. Clears the due and re-derives eligibility.
    ///
    /// # Errors
    ///
    /// - `NoOutstandingDue` when there is nothing to pay
    /// - `InsufficientBalance` when the balance does not cover the due
    pub fn settle_dues(&mut self, account: &mut Account) -> Result<Decimal, LedgerError> {
        let due = account.due;
        if due <= Decimal::ZERO {
            return Err(LedgerError::NoOutstandingDue {
                id: account.id.clone(),
            });
        }

        self.debit(account, due, "pay_dues")?;

        account.due = Decimal::ZERO;
        account.refresh_eligibility();

        Ok(due)
    }

    /// Debit the whole balance ahead of an outbound transfer
    ///
    /// The debit is committed here, before any transfer is attempted. Use
    /// [`Treasury::revert_withdrawal`] if the transfer then fails.
    ///
    /// # Errors
    ///
    /// - `OutstandingDue` if dues are unpaid
    /// - `RentalInProgress` if the account is mid-rental
    pub fn begin_withdrawal(&mut self, account: &mut Account) -> Result<Decimal, LedgerError> {
        if account.due > Decimal::ZERO {
            return Err(LedgerError::OutstandingDue {
                id: account.id.clone(),
                due: account.due,
            });
        }

        if account.active {
            return Err(LedgerError::RentalInProgress {
                id: account.id.clone(),
            });
        }

        let amount = account.balance;
        self.debit(account, amount, "withdraw")?;

        Ok(amount)
    }

    /// Put back a withdrawal whose transfer failed
    pub fn revert_withdrawal(
        &mut self,
        account: &mut Account,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        self.credit(account, amount, "withdraw_revert").map(|_| ())
    }
}
