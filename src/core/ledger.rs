//! Rental ledger
//!
//! This module provides the `RentalLedger`, the single object owning all
//! durable state: the owner identity, the account table and the custodied
//! total. Every public operation is atomic: the access guard runs first,
//! then every precondition, and only then is state written. A failed call
//! leaves the ledger exactly as it found it.
//!
//! Mutating operations:
//! - `register` / `register_with_snapshot` (owner only)
//! - `place_hold` / `release_hold` (owner only)
//! - `deposit`, `pay_dues`, `withdraw` (self only)
//! - `pick_up`, `drop_off` (self only)
//!
//! Each successful mutating call appends exactly one [`LedgerEvent`].

use crate::core::access::{authorize, AccessClass};
use crate::core::clock::SystemClock;
use crate::core::config::LedgerConfig;
use crate::core::lifecycle::{self, Dropoff};
use crate::core::registry::AccountRegistry;
use crate::core::traits::{Clock, LedgerView, Payout};
use crate::core::treasury::Treasury;
use crate::types::{
    Account, AccountId, AccountSnapshot, CallerIdentity, LedgerCall, LedgerError, LedgerEvent,
    Operation, Timestamp,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// The rental ledger
pub struct RentalLedger<C: Clock = SystemClock> {
    owner: AccountId,
    config: LedgerConfig,
    clock: C,
    registry: AccountRegistry,
    treasury: Treasury,
    events: Vec<LedgerEvent>,
}

impl RentalLedger<SystemClock> {
    /// Create a ledger driven by the wall clock
    pub fn with_system_clock(owner: AccountId, config: LedgerConfig) -> Self {
        Self::new(owner, config, SystemClock)
    }
}

impl<C: Clock> RentalLedger<C> {
    /// Create an empty ledger administered by `owner`
    pub fn new(owner: AccountId, config: LedgerConfig, clock: C) -> Self {
        RentalLedger {
            owner,
            config,
            clock,
            registry: AccountRegistry::new(),
            treasury: Treasury::new(),
            events: Vec::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Events emitted so far, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take the emitted events, leaving the log empty
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: LedgerEvent) {
        info!(account = %event.account(), ?event, "ledger event");
        self.events.push(event);
    }

    /// Register a new renter with a zeroed account
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-owner callers, then `InvalidIdentifier`,
    /// `DuplicateAccount` or `EmptyName`.
    pub fn register(
        &mut self,
        caller: &CallerIdentity,
        id: AccountId,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), LedgerError> {
        authorize(&self.owner, caller, AccessClass::Owner, &id, "register")?;
        self.registry.validate_new(&id, first_name, last_name)?;

        let account = Account::new(id.clone(), first_name.to_string(), last_name.to_string());
        self.registry.insert(account)?;

        self.emit(LedgerEvent::AccountRegistered {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        Ok(())
    }

    /// Register a renter with administratively backfilled state
    ///
    /// The snapshot must already satisfy the ledger invariants. Its balance
    /// is added to the custodied total; `can_rent` is derived.
    ///
    /// # Errors
    ///
    /// Same as [`RentalLedger::register`], plus `InvalidBackfill`.
    pub fn register_with_snapshot(
        &mut self,
        caller: &CallerIdentity,
        id: AccountId,
        first_name: &str,
        last_name: &str,
        snapshot: AccountSnapshot,
    ) -> Result<(), LedgerError> {
        authorize(&self.owner, caller, AccessClass::Owner, &id, "register")?;
        self.registry.validate_new(&id, first_name, last_name)?;
        validate_snapshot(&id, &snapshot)?;

        let mut account = Account::new(id.clone(), first_name.to_string(), last_name.to_string());
        account.due = snapshot.due;
        account.active = snapshot.active;
        account.start = snapshot.start;
        account.end = snapshot.end;
        account.accumulated_minutes = snapshot.accumulated_minutes;
        account.hold_reason = snapshot.hold_reason;
        account.refresh_eligibility();

        // Only the total can overflow; check it before the account exists
        self.treasury
            .total_held()
            .checked_add(snapshot.balance)
            .ok_or_else(|| LedgerError::arithmetic_overflow("register", &id))?;

        self.registry.insert(account)?;
        let account = self.registry.get_mut(&id)?;
        self.treasury.credit(account, snapshot.balance, "register")?;

        self.emit(LedgerEvent::AccountRegistered {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        Ok(())
    }

    /// Deposit funds into the caller's own account
    ///
    /// Returns the new balance.
    pub fn deposit(
        &mut self,
        caller: &CallerIdentity,
        id: &AccountId,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        authorize(&self.owner, caller, AccessClass::SelfOnly, id, "deposit")?;
        let account = self.registry.get_mut(id)?;
        let balance = self.treasury.deposit(account, amount)?;

        self.emit(LedgerEvent::DepositRecorded {
            id: id.clone(),
            amount,
        });
        Ok(balance)
    }

    /// Settle outstanding dues from the caller's balance
    ///
    /// Returns the amount paid.
    pub fn pay_dues(
        &mut self,
        caller: &CallerIdentity,
        id: &AccountId,
    ) -> Result<Decimal, LedgerError> {
        authorize(&self.owner, caller, AccessClass::SelfOnly, id, "pay_dues")?;
        let account = self.registry.get_mut(id)?;
        let amount_paid = self.treasury.settle_dues(account)?;

        self.emit(LedgerEvent::DuesSettled {
            id: id.clone(),
            amount_paid,
        });
        Ok(amount_paid)
    }

    /// Withdraw the caller's whole balance through `payout`
    ///
    /// The debit is committed before `payout` is invoked, so the payout sees
    /// a zero balance for the recipient. If the payout fails the debit is
    /// reverted and `TransferFailed` is returned.
    ///
    /// Returns the amount withdrawn.
    pub fn withdraw(
        &mut self,
        caller: &CallerIdentity,
        id: &AccountId,
        payout: &mut dyn Payout,
    ) -> Result<Decimal, LedgerError> {
        authorize(&self.owner, caller, AccessClass::SelfOnly, id, "withdraw")?;
        let account = self.registry.get_mut(id)?;
        let amount = self.treasury.begin_withdrawal(account)?;

        if let Err(message) = payout.send(&*self, id, amount) {
            let account = self.registry.get_mut(id)?;
            self.treasury.revert_withdrawal(account, amount)?;
            warn!(account = %id, %amount, %message, "payout failed, withdrawal reverted");
            return Err(LedgerError::TransferFailed {
                id: id.clone(),
                amount,
                message,
            });
        }

        self.emit(LedgerEvent::FundsWithdrawn {
            id: id.clone(),
            amount,
        });
        Ok(amount)
    }

    /// Start a rental for the caller
    ///
    /// Returns the pickup time.
    ///
    /// # Errors
    ///
    /// After the access guard, in order: `AccountNotFound`, `AlreadyRenting`,
    /// `DuesOutstanding`, `NotEligible`, `InsufficientDeposit`.
    pub fn pick_up(
        &mut self,
        caller: &CallerIdentity,
        id: &AccountId,
    ) -> Result<Timestamp, LedgerError> {
        authorize(&self.owner, caller, AccessClass::SelfOnly, id, "pick_up")?;
        let now = self.clock.now();
        let account = self.registry.get_mut(id)?;
        let start = lifecycle::pick_up(account, now, &self.config)?;

        self.emit(LedgerEvent::PickupRecorded {
            id: id.clone(),
            start,
        });
        Ok(start)
    }

    /// End the caller's rental and accrue its dues
    pub fn drop_off(
        &mut self,
        caller: &CallerIdentity,
        id: &AccountId,
    ) -> Result<Dropoff, LedgerError> {
        authorize(&self.owner, caller, AccessClass::SelfOnly, id, "drop_off")?;
        let now = self.clock.now();
        let account = self.registry.get_mut(id)?;
        let dropoff = lifecycle::drop_off(account, now, &self.config)?;

        self.emit(LedgerEvent::DropoffRecorded {
            id: id.clone(),
            end: dropoff.end,
            due_increment: dropoff.due_increment,
        });
        Ok(dropoff)
    }

    /// Block future pickups for an account
    pub fn place_hold(
        &mut self,
        caller: &CallerIdentity,
        id: &AccountId,
        reason: &str,
    ) -> Result<(), LedgerError> {
        authorize(&self.owner, caller, AccessClass::Owner, id, "place_hold")?;
        let account = self.registry.get_mut(id)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LedgerError::InvalidHoldReason { id: id.clone() });
        }

        account.hold_reason = Some(reason.to_string());
        account.refresh_eligibility();

        self.emit(LedgerEvent::HoldPlaced {
            id: id.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    /// Lift an administrative hold
    pub fn release_hold(&mut self, caller: &CallerIdentity, id: &AccountId) -> Result<(), LedgerError> {
        authorize(&self.owner, caller, AccessClass::Owner, id, "release_hold")?;
        let account = self.registry.get_mut(id)?;

        if account.hold_reason.take().is_none() {
            return Err(LedgerError::NoHold { id: id.clone() });
        }
        account.refresh_eligibility();

        self.emit(LedgerEvent::HoldReleased { id: id.clone() });
        Ok(())
    }

    /// All accounts sorted by id
    pub fn accounts(&self) -> Vec<&Account> {
        self.registry.all_sorted()
    }

    /// Minutes elapsed in the account's rental in progress (zero when idle)
    pub fn current_rental_minutes(&self, id: &AccountId) -> Result<u64, LedgerError> {
        let account = self.registry.get(id)?;
        Ok(lifecycle::current_rental_minutes(account, self.clock.now()))
    }

    /// Dispatch one submitted call
    ///
    /// Rejected calls are logged and returned; the ledger is unchanged.
    pub fn execute(&mut self, call: &LedgerCall, payout: &mut dyn Payout) -> Result<(), LedgerError> {
        let result = self.dispatch(call, payout);
        if let Err(e) = &result {
            warn!(
                operation = %call.operation,
                caller = %call.caller.id(),
                account = %call.account,
                error = %e,
                "call rejected"
            );
        }
        result
    }

    fn dispatch(&mut self, call: &LedgerCall, payout: &mut dyn Payout) -> Result<(), LedgerError> {
        let caller = &call.caller;
        let id = &call.account;
        let op = call.operation.as_str();

        match call.operation {
            Operation::Register => {
                let first_name = call
                    .first_name
                    .as_deref()
                    .ok_or_else(|| LedgerError::missing_argument(op, id, "first_name"))?;
                let last_name = call
                    .last_name
                    .as_deref()
                    .ok_or_else(|| LedgerError::missing_argument(op, id, "last_name"))?;
                self.register(caller, id.clone(), first_name, last_name)
            }
            Operation::Deposit => {
                let amount = call
                    .amount
                    .ok_or_else(|| LedgerError::missing_argument(op, id, "amount"))?;
                self.deposit(caller, id, amount).map(|_| ())
            }
            Operation::PickUp => self.pick_up(caller, id).map(|_| ()),
            Operation::DropOff => self.drop_off(caller, id).map(|_| ()),
            Operation::PayDues => self.pay_dues(caller, id).map(|_| ()),
            Operation::Withdraw => self.withdraw(caller, id, payout).map(|_| ()),
            Operation::Hold => {
                let reason = call
                    .first_name
                    .as_deref()
                    .ok_or_else(|| LedgerError::missing_argument(op, id, "reason"))?;
                self.place_hold(caller, id, reason)
            }
            Operation::Release => self.release_hold(caller, id),
        }
    }

    /// Check the global invariants over every account
    ///
    /// Returns a description of the first violation found.
    pub fn audit(&self) -> Result<(), String> {
        let mut sum = Decimal::ZERO;
        for account in self.registry.iter() {
            let id = &account.id;
            if account.balance < Decimal::ZERO {
                return Err(format!("{}: negative balance {}", id, account.balance));
            }
            if account.due > Decimal::ZERO && account.can_rent {
                return Err(format!("{}: can rent with due {}", id, account.due));
            }
            if account.active && account.due > Decimal::ZERO {
                return Err(format!("{}: renting with due {}", id, account.due));
            }
            let expected = !account.active && account.due.is_zero() && !account.is_on_hold();
            if account.can_rent != expected {
                return Err(format!("{}: can_rent is {}, expected {}", id, account.can_rent, expected));
            }
            if let (Some(start), Some(end)) = (account.start, account.end) {
                if !account.active && start > end {
                    return Err(format!("{}: start {} after end {}", id, start, end));
                }
            }
            sum = sum
                .checked_add(account.balance)
                .ok_or_else(|| format!("{}: balance sum overflows", id))?;
        }

        if sum != self.treasury.total_held() {
            return Err(format!(
                "total held {} differs from sum of balances {}",
                self.treasury.total_held(),
                sum
            ));
        }
        Ok(())
    }
}

impl<C: Clock> LedgerView for RentalLedger<C> {
    fn is_eligible(&self, id: &AccountId) -> Result<bool, LedgerError> {
        Ok(self.registry.get(id)?.can_rent)
    }

    fn balance_of(&self, id: &AccountId) -> Result<Decimal, LedgerError> {
        Ok(self.registry.get(id)?.balance)
    }

    fn due_of(&self, id: &AccountId) -> Result<Decimal, LedgerError> {
        Ok(self.registry.get(id)?.due)
    }

    fn total_duration_of(&self, id: &AccountId) -> Result<u64, LedgerError> {
        Ok(self.registry.get(id)?.accumulated_minutes)
    }

    fn account(&self, id: &AccountId) -> Result<&Account, LedgerError> {
        self.registry.get(id)
    }

    fn total_held(&self) -> Decimal {
        self.treasury.total_held()
    }
}

fn validate_snapshot(id: &AccountId, snapshot: &AccountSnapshot) -> Result<(), LedgerError> {
    if snapshot.balance < Decimal::ZERO {
        return Err(LedgerError::invalid_backfill(id, "balance cannot be negative"));
    }
    if snapshot.due < Decimal::ZERO {
        return Err(LedgerError::invalid_backfill(id, "due cannot be negative"));
    }
    if snapshot.active && snapshot.due > Decimal::ZERO {
        return Err(LedgerError::invalid_backfill(id, "an active rental cannot carry a due"));
    }
    if snapshot.active && snapshot.start.is_none() {
        return Err(LedgerError::invalid_backfill(id, "an active rental needs a start time"));
    }
    if let (Some(start), Some(end)) = (snapshot.start, snapshot.end) {
        if !snapshot.active && start > end {
            return Err(LedgerError::invalid_backfill(id, "start is after end"));
        }
    }
    if let Some(reason) = &snapshot.hold_reason {
        if reason.trim().is_empty() {
            return Err(LedgerError::InvalidHoldReason { id: id.clone() });
        }
    }
    Ok(())
}
