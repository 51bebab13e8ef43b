//! Simulation counters
//!
//! Tracks order flow, cancels, sweeps, trades and resting book size.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::Quantity;
use types::trade::Trade;

/// Aggregated simulation metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub ticks: u64,
    pub orders_submitted: u64,
    pub orders_rejected: u64,
    pub cancels: u64,
    /// Cancels that removed nothing or targeted another agent's order
    pub cancels_ignored: u64,
    pub sweeps: u64,
    pub sweeps_rejected: u64,
    pub total_trades: u64,
    pub total_volume: Quantity,
    pub total_notional: Decimal,
    pub max_resting_orders: usize,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_trades(&mut self, trades: &[Trade]) {
        for trade in trades {
            self.total_trades += 1;
            self.total_volume += trade.quantity;
            self.total_notional += trade.trade_value();
        }
    }

    /// Update max resting order count.
    pub fn update_resting(&mut self, resting: usize) {
        if resting > self.max_resting_orders {
            self.max_resting_orders = resting;
        }
    }

    /// Requests that were refused by the book
    pub fn total_rejected(&self) -> u64 {
        self.orders_rejected + self.sweeps_rejected
    }

    /// Average traded volume per tick
    pub fn volume_per_tick(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.total_volume as f64 / self.ticks as f64
    }

    /// Build a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Ticks: {} | Orders: {} | Rejected: {} | Cancels: {} | Sweeps: {} | Trades: {} | Volume: {}",
            self.ticks,
            self.orders_submitted,
            self.total_rejected(),
            self.cancels,
            self.sweeps,
            self.total_trades,
            self.total_volume,
        )
    }
}
