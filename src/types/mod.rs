//! Types module
//!
//! Contains core data structures used throughout the application:
//! - `account`: account record, identifiers and backfill snapshot
//! - `call`: ledger call records
//! - `event`: notifications emitted by successful calls
//! - `error`: error types for the ledger and the replay pipeline

pub mod account;
pub mod call;
pub mod error;
pub mod event;

pub use account::{Account, AccountId, AccountSnapshot, CallerIdentity, Timestamp};
pub use call::{LedgerCall, Operation};
pub use error::{LedgerError, ReplayError};
pub use event::LedgerEvent;
