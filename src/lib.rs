//! Rental Ledger Library
//! # Overview
//!
//! A custodial ledger for a self-service car-rental service. Renters are
//! registered by the owner, fund their own balance, pick up and drop off
//! cars, and are billed for every started interval of use. Dues must be
//! paid before the next rental or any withdrawal.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, LedgerCall, LedgerEvent, errors)
//! - [`core`] - Business logic components:
//!   - [`core::access`] - Owner/self-only guard run before every mutation
//!   - [`core::registry`] - Account table and registration validation
//!   - [`core::treasury`] - Custodied total, deposits, dues, withdrawals
//!   - [`core::lifecycle`] / [`core::billing`] - Rental state machine and pricing
//!   - [`core::ledger`] - [`RentalLedger`], the atomic public surface
//! - [`io`] - CSV call-log reading and account output
//! - [`strategy`] - Sync and async replay pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Invariants
//!
//! After every call, for every account:
//! - `balance >= 0` and the custodied total equals the sum of balances
//! - `due > 0` implies the renter cannot rent
//! - an active rental never carries a due
//! - `can_rent` is exactly `!active && due == 0 && no hold`
//!
//! A rejected call changes nothing.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{Clock, LedgerConfig, LedgerView, ManualClock, Payout, RecordingPayout, RentalLedger, SystemClock, TallyPayout};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AccountSnapshot, CallerIdentity, LedgerCall, LedgerError, LedgerEvent,
    Operation, ReplayError, Timestamp,
};
