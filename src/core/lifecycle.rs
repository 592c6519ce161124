//! Rental lifecycle
//!
//! Per-account state machine, independent of every other account:
//!
//! ```text
//! Idle --pick_up--> Renting --drop_off--> Idle (due > 0 until paid)
//! ```
//!
//! Both transitions check every precondition and compute every new value
//! before writing anything to the account.

use crate::core::billing;
use crate::core::config::LedgerConfig;
use crate::types::{Account, LedgerError, Timestamp};
use rust_decimal::Decimal;

/// Outcome of a completed rental
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropoff {
    pub end: Timestamp,
    pub due_increment: Decimal,
    pub minutes: u64,
}

/// Start a rental at `now`
///
/// # Errors
///
/// In priority order:
/// - `AlreadyRenting` if the account is active
/// - `DuesOutstanding` if a previous rental is unpaid
/// - `NotEligible` if rental is blocked for another reason (administrative hold)
/// - `InsufficientDeposit` if the balance is below the configured minimum
pub fn pick_up(
    account: &mut Account,
    now: Timestamp,
    config: &LedgerConfig,
) -> Result<Timestamp, LedgerError> {
    if account.active {
        return Err(LedgerError::AlreadyRenting {
            id: account.id.clone(),
        });
    }

    if account.due > Decimal::ZERO {
        return Err(LedgerError::DuesOutstanding {
            id: account.id.clone(),
            due: account.due,
        });
    }

    if !account.can_rent || account.is_on_hold() {
        return Err(LedgerError::NotEligible {
            id: account.id.clone(),
            reason: account.hold_reason.clone(),
        });
    }

    if account.balance < config.min_deposit {
        return Err(LedgerError::InsufficientDeposit {
            id: account.id.clone(),
            balance: account.balance,
            minimum: config.min_deposit,
        });
    }

    account.active = true;
    account.start = Some(now);
    account.refresh_eligibility();

    Ok(now)
}

/// End the current rental at `now` and accrue its dues
///
/// A clock reading earlier than the pickup is clamped to the pickup time,
/// giving a zero-length rental.
///
/// # Errors
///
/// - `NotRenting` if the account is idle
/// - `ArithmeticOverflow` if the due or duration totals overflow
pub fn drop_off(
    account: &mut Account,
    now: Timestamp,
    config: &LedgerConfig,
) -> Result<Dropoff, LedgerError> {
    if !account.active {
        return Err(LedgerError::NotRenting {
            id: account.id.clone(),
        });
    }

    let start = account.start.unwrap_or(now);
    let end = now.max(start);
    let elapsed = end - start;

    let due_increment = billing::due_for(elapsed, config)
        .ok_or_else(|| LedgerError::arithmetic_overflow("drop_off", &account.id))?;

    let new_due = account
        .due
        .checked_add(due_increment)
        .ok_or_else(|| LedgerError::arithmetic_overflow("drop_off", &account.id))?;

    let minutes = billing::whole_minutes(elapsed);
    let new_minutes = account
        .accumulated_minutes
        .checked_add(minutes)
        .ok_or_else(|| LedgerError::arithmetic_overflow("drop_off", &account.id))?;

    account.end = Some(end);
    account.due = new_due;
    account.active = false;
    account.accumulated_minutes = new_minutes;
    account.refresh_eligibility();

    Ok(Dropoff {
        end,
        due_increment,
        minutes,
    })
}

/// Minutes elapsed in the rental in progress, or zero when idle
pub fn current_rental_minutes(account: &Account, now: Timestamp) -> u64 {
    match (account.active, account.start) {
        (true, Some(start)) => billing::whole_minutes(now.saturating_sub(start)),
        _ => 0,
    }
}
