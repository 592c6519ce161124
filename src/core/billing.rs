//! Interval billing
//!
//! Rentals are charged a fixed rate for every interval they touch: a partial
//! interval costs as much as a full one. Reported durations go the other
//! way and round down to whole minutes. Integer and fixed-point arithmetic
//! only.

use crate::core::config::LedgerConfig;
use rust_decimal::Decimal;

const SECS_PER_MINUTE: u64 = 60;

/// Number of started intervals in `elapsed_secs`
pub fn intervals_touched(elapsed_secs: u64, interval_secs: u64) -> u64 {
    if interval_secs == 0 {
        return 0;
    }
    elapsed_secs.div_ceil(interval_secs)
}

/// Whole minutes in `elapsed_secs`, rounded down
pub fn whole_minutes(elapsed_secs: u64) -> u64 {
    elapsed_secs / SECS_PER_MINUTE
}

/// Due accrued by a rental lasting `elapsed_secs`
///
/// Returns `None` if the charge does not fit in a `Decimal`.
pub fn due_for(elapsed_secs: u64, config: &LedgerConfig) -> Option<Decimal> {
    let intervals = intervals_touched(elapsed_secs, config.interval_secs);
    Decimal::from(intervals).checked_mul(config.rate_per_interval)
}
