//! Trading agents
//!
//! Every agent reads the book and the current true price once per tick and
//! answers with an `AgentAction`. Agents never touch the book directly; the
//! market applies their requests in order and reports fills back.

pub mod greedy;
pub mod informed_trader;
pub mod market_maker;
pub mod noise_trader;
pub mod splitting;

pub use greedy::{GreedyAdaptiveBot, GreedyLookaheadBot};
pub use informed_trader::{InformedTrader, InformedTraderConfig};
pub use market_maker::{MarketMaker, MarketMakerConfig};
pub use noise_trader::{NoiseTrader, NoiseTraderConfig};
pub use splitting::{AdaptiveSplittingBot, ParentOrder, SplittingBot};

use matching_engine::{OrderBook, SweepReport};
use rust_decimal::Decimal;
use types::ids::{AgentId, OrderId, Tick};
use types::numeric::Price;
use types::order::{OrderRequest, SweepRequest};
use types::trade::Trade;

use crate::price::sampled_step;

/// Requests an agent emits for one tick, applied as cancels, then limit
/// orders, then sweeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentAction {
    pub orders: Vec<OrderRequest>,
    pub cancels: Vec<OrderId>,
    pub sweeps: Vec<SweepRequest>,
}

impl AgentAction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn sweep(request: SweepRequest) -> Self {
        Self {
            sweeps: vec![request],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.cancels.is_empty() && self.sweeps.is_empty()
    }
}

/// A market participant
pub trait TradingAgent {
    fn id(&self) -> AgentId;

    fn name(&self) -> &str;

    /// Decide this tick's requests from a read-only view of the book.
    fn act(&mut self, tick: Tick, true_price: Price, book: &OrderBook) -> AgentAction;

    /// Called once per trade this agent took part in, as maker or taker.
    fn on_fill(&mut self, _trade: &Trade) {}

    /// Called with the result of each sweep this agent requested.
    fn on_sweep(&mut self, _report: &SweepReport) {}
}

/// Convert a sampled offset to a decimal rounded to `dp` places.
pub(crate) fn offset(value: f64, dp: u32) -> Decimal {
    sampled_step(value).round_dp(dp)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use types::numeric::Quantity;
    use types::order::{Order, Side};

    /// Run one tick of `agent` against `book`, executing its sweeps in place.
    pub(crate) fn sweep_tick(agent: &mut dyn TradingAgent, book: &mut OrderBook, tick: Tick) -> Vec<SweepReport> {
        let action = agent.act(tick, Price::from_u64(100), book);
        let mut reports = Vec::new();
        for sweep in action.sweeps {
            let id = book.next_order_id();
            if let Ok(report) = book.execute_market(id, agent.id(), sweep.side, sweep.quantity, tick) {
                agent.on_sweep(&report);
                reports.push(report);
            }
        }
        reports
    }

    /// Rest `levels` of (price, quantity) on one side for a liquidity provider.
    pub(crate) fn seed_side(book: &mut OrderBook, side: Side, levels: &[(u64, Quantity)]) {
        for &(price, quantity) in levels {
            let id = book.next_order_id();
            let order = Order::new(id, AgentId::new(99), side, Price::from_u64(price), quantity, 0);
            book.submit(order).expect("seed order");
        }
    }
}
