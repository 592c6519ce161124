//! Ledger configuration
//!
//! Holds the pricing and eligibility constants the ledger is deployed with.

use rust_decimal::Decimal;
use tracing::warn;

/// Ledger constants
///
/// Defaults match the deployed rental ledger: a 0.001 minimum deposit and a
/// 0.001 charge for every started two-minute interval.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Minimum balance required before a pickup
    pub min_deposit: Decimal,
    /// Charge accrued per started interval of active rental
    pub rate_per_interval: Decimal,
    /// Interval length in seconds
    pub interval_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_deposit: Decimal::new(1, 3),
            rate_per_interval: Decimal::new(1, 3),
            interval_secs: 120,
        }
    }
}

impl LedgerConfig {
    /// Create a LedgerConfig with custom values
    ///
    /// Invalid values (negative amounts, zero-length interval) fall back to
    /// the defaults with a warning.
    pub fn new(min_deposit: Decimal, rate_per_interval: Decimal, interval_secs: u64) -> Self {
        let default = Self::default();

        let min_deposit = if min_deposit < Decimal::ZERO {
            warn!(%min_deposit, fallback = %default.min_deposit, "invalid min_deposit, using default");
            default.min_deposit
        } else {
            min_deposit
        };

        let rate_per_interval = if rate_per_interval < Decimal::ZERO {
            warn!(%rate_per_interval, fallback = %default.rate_per_interval, "invalid rate_per_interval, using default");
            default.rate_per_interval
        } else {
            rate_per_interval
        };

        let interval_secs = if interval_secs == 0 {
            warn!(interval_secs, fallback = default.interval_secs, "invalid interval_secs, using default");
            default.interval_secs
        } else {
            interval_secs
        };

        Self {
            min_deposit,
            rate_per_interval,
            interval_secs,
        }
    }
}
