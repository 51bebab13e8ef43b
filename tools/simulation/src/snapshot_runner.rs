//! Snapshot-driven strategy evaluation
//!
//! Replays a fixed sequence of depth snapshots against one execution bot.
//! Each snapshot becomes a fresh book for one tick; the bot acts once on it
//! and only its sweeps are executed. Nothing carries over between ticks
//! except the bot's own state.

use matching_engine::{OrderBook, SnapshotOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::errors::{ConfigError, OrderError};
use types::ids::Tick;
use types::numeric::{Price, Quantity, BPS_PER_UNIT};
use types::order::Side;

use crate::agents::TradingAgent;

/// Outcome of one strategy run over the snapshot sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub side: Side,
    pub target: Quantity,
    pub executed: Quantity,
    pub remaining: Quantity,
    pub total_cost: Decimal,
    /// Volume-weighted execution price, None if nothing filled
    pub avg_price: Option<Decimal>,
    /// Slippage against the mid of the last snapshot used, positive is worse
    pub impact_bps: Option<Decimal>,
    /// Snapshots consumed
    pub ticks: usize,
}

/// Runs execution bots over a fixed set of depth snapshots
#[derive(Debug, Clone, Default)]
pub struct SnapshotRunner {
    snapshots: Vec<Vec<SnapshotOrder>>,
}

impl SnapshotRunner {
    pub fn new(snapshots: Vec<Vec<SnapshotOrder>>) -> Self {
        Self { snapshots }
    }

    /// Parse a JSON array of snapshots, each an array of
    /// `{"side", "price", "size"}` entries.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let snapshots = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self::new(snapshots))
    }

    pub fn snapshots(&self) -> &[Vec<SnapshotOrder>] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drive `bot` through the snapshots until `target` is executed, the
    /// snapshots run out, or `max_ticks` is reached.
    ///
    /// The bot must already hold its parent order for `side` and `target`.
    /// A snapshot without a mid price is still consumed; the bot sees the
    /// best available quote, or the last mid, as the reference price.
    pub fn run_strategy(
        &self,
        bot: &mut dyn TradingAgent,
        side: Side,
        target: Quantity,
        max_ticks: Option<usize>,
    ) -> Result<StrategyResult, OrderError> {
        let limit = max_ticks.unwrap_or(usize::MAX);
        let mut executed: Quantity = 0;
        let mut total_cost = Decimal::ZERO;
        let mut last_mid: Option<Decimal> = None;
        let mut reference: Option<Price> = None;
        let mut ticks = 0;

        for snapshot in self.snapshots.iter().take(limit) {
            if executed >= target {
                break;
            }
            ticks += 1;
            let tick = ticks as Tick;
            let mut book = OrderBook::from_snapshot(snapshot)?;

            last_mid = book.mid_price();
            reference = last_mid
                .and_then(Price::try_new)
                .or_else(|| book.best_ask())
                .or_else(|| book.best_bid())
                .or(reference);
            let Some(true_price) = reference else {
                debug!(tick, "Skipping empty snapshot");
                continue;
            };

            let action = bot.act(tick, true_price, &book);
            if !action.orders.is_empty() || !action.cancels.is_empty() {
                debug!(
                    agent = %bot.id(),
                    tick,
                    orders = action.orders.len(),
                    cancels = action.cancels.len(),
                    "Ignoring passive requests on snapshot"
                );
            }

            for sweep in action.sweeps {
                let order_id = book.next_order_id();
                match book.execute_market(order_id, bot.id(), sweep.side, sweep.quantity, tick) {
                    Ok(report) => {
                        if report.side == side {
                            executed += report.executed;
                            total_cost += report.trades.iter().map(|t| t.trade_value()).sum::<Decimal>();
                        }
                        for trade in &report.trades {
                            bot.on_fill(trade);
                        }
                        bot.on_sweep(&report);
                    }
                    Err(err) => {
                        warn!(agent = %bot.id(), tick, error = %err, "Rejected sweep request");
                    }
                }
            }
        }

        let avg_price = (executed > 0).then(|| total_cost / Decimal::from(executed));
        let impact_bps = match (avg_price, last_mid) {
            (Some(avg), Some(mid)) => {
                let bps = Decimal::from(BPS_PER_UNIT);
                Some(match side {
                    Side::BUY => (avg / mid - Decimal::ONE) * bps,
                    Side::SELL => (Decimal::ONE - avg / mid) * bps,
                })
            }
            _ => None,
        };

        let result = StrategyResult {
            side,
            target,
            executed,
            remaining: target.saturating_sub(executed),
            total_cost,
            avg_price,
            impact_bps,
            ticks,
        };
        info!(
            agent = %bot.id(),
            executed = result.executed,
            remaining = result.remaining,
            ticks = result.ticks,
            "Strategy run complete"
        );
        Ok(result)
    }
}
