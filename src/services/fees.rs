//! Fee Calculator
//!
//! Pure fee computation, isolated so the schedule can change without
//! touching settlement. Brokerage is a percentage of notional clamped to a
//! [min, max] band; convenience is a flat amount per order. The default
//! schedule charges nothing, matching current policy, and sells are never
//! charged for now (the `side` parameter stays in the contract so that
//! policy can change here alone).

use crate::types::{FeeBreakdown, OrderKind, OrderSide};

/// Fee schedule applied to order notional.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    /// Brokerage rate as a fraction of notional (0.001 = 0.1%)
    pub brokerage_rate: f64,
    /// Lower clamp on the brokerage fee
    pub brokerage_min: f64,
    /// Upper clamp on the brokerage fee (0 = no cap)
    pub brokerage_max: f64,
    /// Flat convenience fee per limit/stop order
    pub convenience_flat: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage_rate: 0.0,
            brokerage_min: 0.0,
            brokerage_max: 0.0,
            convenience_flat: 0.0,
        }
    }
}

impl FeeSchedule {
    /// Compute the fee breakdown for an order. Deterministic, no I/O.
    pub fn compute(&self, notional: f64, kind: OrderKind, side: OrderSide) -> FeeBreakdown {
        // Current policy: sells are not charged.
        if side == OrderSide::Sell {
            return FeeBreakdown::default();
        }

        let mut brokerage = notional * self.brokerage_rate;
        if brokerage < self.brokerage_min {
            brokerage = self.brokerage_min;
        }
        if self.brokerage_max > 0.0 && brokerage > self.brokerage_max {
            brokerage = self.brokerage_max;
        }

        // Market orders ride the live quote and skip the convenience fee.
        let convenience = match kind {
            OrderKind::Market => 0.0,
            OrderKind::Limit | OrderKind::Stop => self.convenience_flat,
        };

        FeeBreakdown { brokerage, convenience }
    }
}
