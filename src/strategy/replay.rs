//! Replay driver shared by every strategy
//!
//! Owns the ledger being rebuilt. Each call's `at` column moves a
//! [`ManualClock`] before the call executes, so durations come from the
//! log rather than the wall clock. Rejected calls and malformed rows are
//! logged and counted but never stop the replay.
//!
//! Memory stays flat over the length of the log: events are drained after
//! every call and payouts only keep a running total.

use crate::core::{LedgerView, ManualClock, RentalLedger, TallyPayout};
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::ReplayConfig;
use crate::types::{LedgerCall, ReplayError};
use std::io::Write;
use tracing::{info, warn};

/// Single-writer ledger replay
pub struct Replay {
    ledger: RentalLedger<ManualClock>,
    payout: TallyPayout,
    applied: usize,
    events: usize,
    rejected: usize,
    malformed: usize,
}

impl Replay {
    pub fn new(config: &ReplayConfig) -> Self {
        Self {
            ledger: RentalLedger::new(config.owner.clone(), config.ledger.clone(), ManualClock::new(0)),
            payout: TallyPayout::new(),
            applied: 0,
            events: 0,
            rejected: 0,
            malformed: 0,
        }
    }

    /// Execute one call at its recorded time
    ///
    /// Calls without a time run at the time of the previous call.
    pub fn apply(&mut self, call: LedgerCall) {
        if let Some(at) = call.at {
            self.ledger.clock().set(at);
        }

        match self.ledger.execute(&call, &mut self.payout) {
            Ok(()) => self.applied += 1,
            Err(_) => self.rejected += 1,
        }
        self.events += self.ledger.drain_events().len();
    }

    /// Note a row that could not be turned into a call
    pub fn skip(&mut self, error: &str) {
        warn!(%error, "skipping malformed row");
        self.malformed += 1;
    }

    /// Add rows already logged and skipped by a reader
    pub fn add_skipped(&mut self, count: usize) {
        self.malformed += count;
    }

    pub fn ledger(&self) -> &RentalLedger<ManualClock> {
        &self.ledger
    }

    /// Write the final account table and log a summary
    pub fn finish(self, output: &mut dyn Write) -> Result<(), ReplayError> {
        info!(
            applied = self.applied,
            rejected = self.rejected,
            events = self.events,
            malformed = self.malformed,
            accounts = self.ledger.accounts().len(),
            total_held = %self.ledger.total_held(),
            payouts = self.payout.count(),
            paid_out = %self.payout.total_paid(),
            "replay finished"
        );

        write_accounts_csv(&self.ledger.accounts(), output)
            .map_err(|message| ReplayError::IoError { message })
    }
}
