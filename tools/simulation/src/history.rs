//! Market history
//!
//! Append-only record of the true price per tick and every trade and sweep,
//! exposed as plain `(tick, price)` sequences for charting.

use matching_engine::SweepReport;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::Tick;
use types::numeric::{Price, Quantity};
use types::trade::Trade;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketHistory {
    /// True price by tick; index 0 is the initial price
    prices: Vec<Price>,
    trades: Vec<Trade>,
    sweeps: Vec<SweepReport>,
}

impl MarketHistory {
    pub fn new(initial_price: Price) -> Self {
        Self {
            prices: vec![initial_price],
            trades: Vec::new(),
            sweeps: Vec::new(),
        }
    }

    pub(crate) fn record_price(&mut self, price: Price) {
        self.prices.push(price);
    }

    pub(crate) fn record_trades(&mut self, trades: &[Trade]) {
        self.trades.extend_from_slice(trades);
    }

    pub(crate) fn record_sweep(&mut self, report: &SweepReport) {
        self.sweeps.push(report.clone());
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn sweeps(&self) -> &[SweepReport] {
        &self.sweeps
    }

    /// True price series as (tick, price)
    pub fn price_series(&self) -> Vec<(Tick, Price)> {
        self.prices
            .iter()
            .enumerate()
            .map(|(tick, price)| (tick as Tick, *price))
            .collect()
    }

    /// Trade prints as (tick, price) in execution order
    pub fn trade_series(&self) -> Vec<(Tick, Price)> {
        self.trades.iter().map(|t| (t.tick, t.price)).collect()
    }

    pub fn volume(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    /// Volume-weighted average trade price, None before the first trade
    pub fn vwap(&self) -> Option<Decimal> {
        let volume = self.volume();
        if volume == 0 {
            return None;
        }
        let notional: Decimal = self.trades.iter().map(Trade::trade_value).sum();
        Some(notional / Decimal::from(volume))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
