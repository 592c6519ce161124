//! Core ledger logic
//!
//! - `access` - Owner/self-only authorization guard
//! - `registry` - Account table and registration validation
//! - `treasury` - Custodied total and balance movements
//! - `billing` - Interval charge and duration arithmetic
//! - `lifecycle` - Pickup/dropoff state machine
//! - `ledger` - The `RentalLedger` tying the pieces together
//! - `traits` - Seams for the clock, the payout primitive and read access

pub mod access;
pub mod billing;
pub mod clock;
pub mod config;
pub mod ledger;
pub mod lifecycle;
pub mod payout;
pub mod registry;
pub mod traits;
pub mod treasury;

pub use clock::{ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use ledger::RentalLedger;
pub use lifecycle::Dropoff;
pub use payout::{RecordingPayout, TallyPayout, Transfer};
pub use traits::{Clock, LedgerView, Payout};
