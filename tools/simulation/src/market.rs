//! Deterministic tick loop
//!
//! Each tick advances the true price, then lets every agent act in
//! registration order. An agent's requests are applied immediately, so later
//! agents see the book as earlier agents left it. Fills are reported back to
//! every agent that took part in a trade.

use matching_engine::OrderBook;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::errors::ConfigError;
use types::ids::{AgentId, Tick};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

use crate::agents::{AgentAction, TradingAgent};
use crate::history::MarketHistory;
use crate::metrics::SimMetrics;
use crate::price::PriceProcess;

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick: Tick,
    pub true_price: Price,
    pub orders_submitted: u64,
    pub requests_rejected: u64,
    pub cancels: u64,
    pub sweeps: u64,
    pub trades: u64,
    pub volume: Quantity,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub resting_orders: usize,
}

impl TickSummary {
    fn new(tick: Tick, true_price: Price) -> Self {
        Self {
            tick,
            true_price,
            orders_submitted: 0,
            requests_rejected: 0,
            cancels: 0,
            sweeps: 0,
            trades: 0,
            volume: 0,
            best_bid: None,
            best_ask: None,
            resting_orders: 0,
        }
    }
}

/// Single-security market: true price, order book and agents
pub struct Market {
    process: PriceProcess,
    book: OrderBook,
    agents: Vec<Box<dyn TradingAgent>>,
    history: MarketHistory,
    metrics: SimMetrics,
}

impl std::fmt::Debug for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Market").finish_non_exhaustive()
    }
}

impl Market {
    pub fn new(process: PriceProcess) -> Self {
        let history = MarketHistory::new(process.current());
        Self {
            process,
            book: OrderBook::new(),
            agents: Vec::new(),
            history,
            metrics: SimMetrics::new(),
        }
    }

    /// Add an agent. Agents act in the order they were registered.
    pub fn register(&mut self, agent: Box<dyn TradingAgent>) -> Result<(), ConfigError> {
        let id = agent.id();
        if self.agents.iter().any(|a| a.id() == id) {
            return Err(ConfigError::DuplicateAgent {
                agent_id: id.to_string(),
            });
        }
        info!(agent = %id, name = agent.name(), "Registered agent");
        self.agents.push(agent);
        Ok(())
    }

    /// Advance one tick.
    pub fn step(&mut self) -> TickSummary {
        let true_price = self.process.next_price();
        let tick = self.process.tick();
        self.history.record_price(true_price);

        let mut summary = TickSummary::new(tick, true_price);
        for index in 0..self.agents.len() {
            let agent_id = self.agents[index].id();
            let action = self.agents[index].act(tick, true_price, &self.book);
            self.apply(index, agent_id, action, tick, &mut summary);
        }

        self.metrics.ticks += 1;
        self.metrics.update_resting(self.book.order_count());
        summary.best_bid = self.book.best_bid();
        summary.best_ask = self.book.best_ask();
        summary.resting_orders = self.book.order_count();

        debug!(
            tick,
            true_price = %true_price,
            trades = summary.trades,
            volume = summary.volume,
            resting = summary.resting_orders,
            "Tick complete"
        );
        summary
    }

    /// Run `ticks` steps and return their summaries.
    pub fn run(&mut self, ticks: u64) -> Vec<TickSummary> {
        info!(ticks, agents = self.agents.len(), start_price = %self.process.current(), "Starting run");
        let summaries: Vec<TickSummary> = (0..ticks).map(|_| self.step()).collect();
        info!(
            final_price = %self.process.current(),
            summary = %self.metrics.summary(),
            "Run finished"
        );
        summaries
    }

    /// Apply one agent's requests: cancels, then limit orders, then sweeps
    fn apply(&mut self, index: usize, agent_id: AgentId, action: AgentAction, tick: Tick, summary: &mut TickSummary) {
        for order_id in action.cancels {
            match self.book.order(order_id).map(|o| o.owner) {
                Some(owner) if owner == agent_id => {
                    self.book.cancel(order_id);
                    self.metrics.cancels += 1;
                    summary.cancels += 1;
                }
                Some(owner) => {
                    warn!(agent = %agent_id, order_id = %order_id, owner = %owner, "Ignoring cancel of another agent's order");
                    self.metrics.cancels_ignored += 1;
                }
                None => {
                    debug!(agent = %agent_id, order_id = %order_id, "Cancel of order no longer resting");
                    self.metrics.cancels_ignored += 1;
                }
            }
        }

        for request in action.orders {
            let order_id = self.book.next_order_id();
            match self.book.submit(request.into_order(order_id, agent_id, tick)) {
                Ok(trades) => {
                    self.metrics.orders_submitted += 1;
                    summary.orders_submitted += 1;
                    self.settle(&trades, summary);
                }
                Err(err) => {
                    warn!(agent = %agent_id, tick, error = %err, "Rejected order request");
                    self.metrics.orders_rejected += 1;
                    summary.requests_rejected += 1;
                }
            }
        }

        for sweep in action.sweeps {
            let order_id = self.book.next_order_id();
            match self.book.execute_market(order_id, agent_id, sweep.side, sweep.quantity, tick) {
                Ok(report) => {
                    self.metrics.sweeps += 1;
                    summary.sweeps += 1;
                    self.settle(&report.trades, summary);
                    self.history.record_sweep(&report);
                    self.agents[index].on_sweep(&report);
                }
                Err(err) => {
                    warn!(agent = %agent_id, tick, error = %err, "Rejected sweep request");
                    self.metrics.sweeps_rejected += 1;
                    summary.requests_rejected += 1;
                }
            }
        }
    }

    fn settle(&mut self, trades: &[Trade], summary: &mut TickSummary) {
        if trades.is_empty() {
            return;
        }
        self.history.record_trades(trades);
        self.metrics.record_trades(trades);
        summary.trades += trades.len() as u64;
        summary.volume += trades.iter().map(|t| t.quantity).sum::<Quantity>();

        for trade in trades {
            for agent in self.agents.iter_mut() {
                if trade.involves(agent.id()) {
                    agent.on_fill(trade);
                }
            }
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn history(&self) -> &MarketHistory {
        &self.history
    }

    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    pub fn price_process(&self) -> &PriceProcess {
        &self.process
    }

    pub fn tick(&self) -> Tick {
        self.process.tick()
    }

    pub fn true_price(&self) -> Price {
        self.process.current()
    }

    pub fn agents(&self) -> impl Iterator<Item = &dyn TradingAgent> {
        self.agents.iter().map(|a| a.as_ref())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }
}
