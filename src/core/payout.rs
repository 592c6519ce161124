//! Payout implementations

use crate::core::traits::{LedgerView, Payout};
use crate::types::AccountId;
use rust_decimal::Decimal;
use tracing::debug;

/// Outbound transfer as seen by the payout primitive
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub recipient: AccountId,
    pub amount: Decimal,
}

/// Payout that records every transfer instead of moving real value
#[derive(Debug, Default)]
pub struct RecordingPayout {
    transfers: Vec<Transfer>,
}

impl RecordingPayout {
    pub fn new() -> Self {
        RecordingPayout {
            transfers: Vec::new(),
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Total value paid out so far
    pub fn total_paid(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

impl Payout for RecordingPayout {
    fn send(
        &mut self,
        _view: &dyn LedgerView,
        recipient: &AccountId,
        amount: Decimal,
    ) -> Result<(), String> {
        debug!(%recipient, %amount, "payout recorded");
        self.transfers.push(Transfer {
            recipient: recipient.clone(),
            amount,
        });
        Ok(())
    }
}

/// Payout that keeps only a running total
///
/// Used by the replay, where individual transfers are logged but not kept.
#[derive(Debug, Default)]
pub struct TallyPayout {
    count: usize,
    total: Decimal,
}

impl TallyPayout {
    pub fn new() -> Self {
        TallyPayout::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total_paid(&self) -> Decimal {
        self.total
    }
}

impl Payout for TallyPayout {
    fn send(
        &mut self,
        _view: &dyn LedgerView,
        recipient: &AccountId,
        amount: Decimal,
    ) -> Result<(), String> {
        let total = self
            .total
            .checked_add(amount)
            .ok_or_else(|| format!("payout total overflow sending {} to {}", amount, recipient))?;
        debug!(%recipient, %amount, "payout tallied");
        self.total = total;
        self.count += 1;
        Ok(())
    }
}
