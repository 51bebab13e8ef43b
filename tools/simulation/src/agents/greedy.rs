//! Greedy execution bots
//!
//! Pick each tick's slice size from a set of candidates by estimating the
//! execution price against the current book. `GreedyAdaptiveBot` looks only
//! at the immediate sweep; `GreedyLookaheadBot` replays several slices on a
//! private copy of the book, assuming makers replenish between them.

use matching_engine::{OrderBook, SweepReport};
use rust_decimal::Decimal;
use types::errors::ConfigError;
use types::ids::{AgentId, Tick};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side, SweepRequest};
use types::trade::Trade;

use super::splitting::ParentOrder;
use super::{AgentAction, TradingAgent};

/// Default slice candidates for both greedy bots
pub const DEFAULT_CANDIDATES: [Quantity; 5] = [1, 2, 5, 10, 20];

/// Owner of liquidity a lookahead adds to its private book
const SYNTHETIC_OWNER: AgentId = AgentId::new(u32::MAX);

fn validate_candidates(candidates: &[Quantity]) -> Result<(), ConfigError> {
    if candidates.is_empty() || candidates.contains(&0) {
        return Err(ConfigError::invalid("candidates", "need at least one positive slice size"));
    }
    Ok(())
}

/// Whether `candidate` is a better average execution price than `best` for `side`
fn improves(side: Side, candidate: Decimal, best: Option<Decimal>) -> bool {
    match (side, best) {
        (_, None) => true,
        (Side::BUY, Some(best)) => candidate < best,
        (Side::SELL, Some(best)) => candidate > best,
    }
}

/// Greedy one-step slice selection using estimated price impact
#[derive(Debug, Clone)]
pub struct GreedyAdaptiveBot {
    id: AgentId,
    name: String,
    candidates: Vec<Quantity>,
    min_slice: Quantity,
    max_slice: Quantity,
    parent: Option<ParentOrder>,
    executions: Vec<SweepReport>,
}

impl GreedyAdaptiveBot {
    pub fn new(
        id: AgentId,
        candidates: Vec<Quantity>,
        min_slice: Quantity,
        max_slice: Quantity,
    ) -> Result<Self, ConfigError> {
        validate_candidates(&candidates)?;
        if min_slice == 0 || min_slice > max_slice {
            return Err(ConfigError::invalid("min_slice", "must satisfy 0 < min_slice <= max_slice"));
        }
        Ok(Self {
            id,
            name: format!("greedy-adaptive-{}", id.as_u32()),
            candidates,
            min_slice,
            max_slice,
            parent: None,
            executions: Vec::new(),
        })
    }

    pub fn start(&mut self, side: Side, total: Quantity) -> Result<(), ConfigError> {
        self.parent = Some(ParentOrder::new(side, total)?);
        self.executions.clear();
        Ok(())
    }

    /// Choose the slice with the lowest estimated impact. Among equal
    /// estimates the larger slice wins. Falls back to `min_slice` when the
    /// book has no mid price.
    pub fn next_slice(&self, book: &OrderBook) -> Option<Quantity> {
        let parent = self.parent.filter(|p| !p.is_complete())?;
        if book.mid_price().is_none() {
            return Some(self.min_slice.min(parent.remaining));
        }

        let mut best: Option<(Quantity, Decimal)> = None;
        for &candidate in &self.candidates {
            let slice = candidate
                .min(parent.remaining)
                .min(self.max_slice)
                .max(self.min_slice);
            let impact = book.price_impact_bps(parent.side, slice);
            if best.map_or(true, |(_, lowest)| impact <= lowest) {
                best = Some((slice, impact));
            }
        }
        best.map(|(slice, _)| slice.min(parent.remaining))
    }

    pub fn is_active(&self) -> bool {
        self.parent.is_some_and(|p| !p.is_complete())
    }

    pub fn parent(&self) -> Option<&ParentOrder> {
        self.parent.as_ref()
    }

    pub fn executions(&self) -> &[SweepReport] {
        &self.executions
    }
}

impl TradingAgent for GreedyAdaptiveBot {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, _tick: Tick, _true_price: Price, book: &OrderBook) -> AgentAction {
        match (self.parent, self.next_slice(book)) {
            (Some(parent), Some(quantity)) => AgentAction::sweep(SweepRequest {
                side: parent.side,
                quantity,
            }),
            _ => AgentAction::none(),
        }
    }

    fn on_sweep(&mut self, report: &SweepReport) {
        if let Some(parent) = self.parent.as_mut() {
            parent.apply(report);
            self.executions.push(report.clone());
        }
    }
}

/// Greedy slice selection with a multi-step lookahead
#[derive(Debug, Clone)]
pub struct GreedyLookaheadBot {
    id: AgentId,
    name: String,
    /// Slices simulated per candidate, including the immediate one
    horizon: u32,
    candidates: Vec<Quantity>,
    /// Liquidity assumed to reappear at the best level after each slice
    replenish_size: Quantity,
    parent: Option<ParentOrder>,
    executions: Vec<SweepReport>,
}

impl GreedyLookaheadBot {
    pub fn new(
        id: AgentId,
        horizon: u32,
        candidates: Vec<Quantity>,
        replenish_size: Quantity,
    ) -> Result<Self, ConfigError> {
        if horizon == 0 {
            return Err(ConfigError::invalid("horizon", "must be at least 1"));
        }
        validate_candidates(&candidates)?;
        Ok(Self {
            id,
            name: format!("greedy-lookahead-{}", id.as_u32()),
            horizon,
            candidates,
            replenish_size,
            parent: None,
            executions: Vec::new(),
        })
    }

    pub fn start(&mut self, side: Side, total: Quantity) -> Result<(), ConfigError> {
        self.parent = Some(ParentOrder::new(side, total)?);
        self.executions.clear();
        Ok(())
    }

    /// Estimated average price of repeating `slice` over the horizon on a
    /// copy of `book`. None if nothing would execute.
    pub fn estimate(&self, book: &OrderBook, true_price: Price, slice: Quantity, tick: Tick) -> Option<Decimal> {
        let parent = self.parent?;
        let mut sim = book.clone();
        let mut left = parent.remaining;
        let mut cost = Decimal::ZERO;
        let mut executed: Quantity = 0;

        for _ in 0..self.horizon {
            let quantity = slice.min(left);
            if quantity == 0 {
                break;
            }
            let id = sim.next_order_id();
            let Ok(report) = sim.execute_market(id, self.id, parent.side, quantity, tick) else {
                break;
            };
            cost += report.trades.iter().map(Trade::trade_value).sum::<Decimal>();
            executed += report.executed;
            left -= report.executed;
            self.replenish(&mut sim, parent.side, true_price, tick);
        }

        (executed > 0).then(|| cost / Decimal::from(executed))
    }

    /// Add one synthetic passive order half a unit outside the mid, or one
    /// unit outside the true price when the book is one-sided.
    fn replenish(&self, sim: &mut OrderBook, side: Side, true_price: Price, tick: Tick) {
        if self.replenish_size == 0 {
            return;
        }
        let price = match (sim.mid_price(), side) {
            (Some(mid), Side::BUY) => mid + Decimal::new(5, 1),
            (Some(mid), Side::SELL) => mid - Decimal::new(5, 1),
            (None, Side::BUY) => true_price.as_decimal() + Decimal::ONE,
            (None, Side::SELL) => true_price.as_decimal() - Decimal::ONE,
        };
        let Some(price) = Price::try_new(price) else {
            return;
        };
        let id = sim.next_order_id();
        let order = Order::new(id, SYNTHETIC_OWNER, side.opposite(), price, self.replenish_size, tick);
        // Valid by construction
        let _ = sim.submit(order);
    }

    /// Candidate with the best estimated average price over the horizon
    pub fn next_slice(&self, book: &OrderBook, true_price: Price, tick: Tick) -> Option<Quantity> {
        let parent = self.parent.filter(|p| !p.is_complete())?;

        let mut chosen = self.candidates[0];
        let mut best: Option<Decimal> = None;
        for &candidate in &self.candidates {
            let slice = candidate.min(parent.remaining);
            if let Some(avg) = self.estimate(book, true_price, slice, tick) {
                if improves(parent.side, avg, best) {
                    best = Some(avg);
                    chosen = slice;
                }
            }
        }
        Some(chosen.min(parent.remaining))
    }

    pub fn is_active(&self) -> bool {
        self.parent.is_some_and(|p| !p.is_complete())
    }

    pub fn parent(&self) -> Option<&ParentOrder> {
        self.parent.as_ref()
    }

    pub fn executions(&self) -> &[SweepReport] {
        &self.executions
    }
}

impl TradingAgent for GreedyLookaheadBot {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, tick: Tick, true_price: Price, book: &OrderBook) -> AgentAction {
        match (self.parent, self.next_slice(book, true_price, tick)) {
            (Some(parent), Some(quantity)) => AgentAction::sweep(SweepRequest {
                side: parent.side,
                quantity,
            }),
            _ => AgentAction::none(),
        }
    }

    fn on_sweep(&mut self, report: &SweepReport) {
        if let Some(parent) = self.parent.as_mut() {
            parent.apply(report);
            self.executions.push(report.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{seed_side, sweep_tick};

    #[test]
    fn test_adaptive_prefers_largest_slice_at_best_level() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 5), (105, 100)]);
        seed_side(&mut book, Side::BUY, &[(99, 100)]);
        let mut bot = GreedyAdaptiveBot::new(AgentId::new(7), vec![1, 2, 5, 10], 1, 10).unwrap();
        bot.start(Side::BUY, 50).unwrap();

        // 1, 2 and 5 all fill at 101 (100 bps); 10 reaches 105
        assert_eq!(bot.next_slice(&book), Some(5));
    }

    #[test]
    fn test_adaptive_without_mid_uses_min_slice() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 5)]);
        let mut bot = GreedyAdaptiveBot::new(AgentId::new(7), vec![1, 5], 3, 10).unwrap();
        bot.start(Side::BUY, 50).unwrap();

        assert_eq!(bot.next_slice(&book), Some(3));
    }

    #[test]
    fn test_adaptive_completes_parent() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 100)]);
        seed_side(&mut book, Side::BUY, &[(99, 100)]);
        let mut bot = GreedyAdaptiveBot::new(AgentId::new(7), vec![4], 1, 10).unwrap();
        bot.start(Side::BUY, 10).unwrap();

        for tick in 1..=3 {
            sweep_tick(&mut bot, &mut book, tick);
        }
        assert!(!bot.is_active());
        let sizes: Vec<_> = bot.executions().iter().map(|r| r.executed).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_lookahead_buy_picks_cheapest_path() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 2), (110, 100)]);
        seed_side(&mut book, Side::BUY, &[(99, 100)]);
        let before = book.ask_levels();

        let mut bot = GreedyLookaheadBot::new(AgentId::new(8), 2, vec![1, 2, 10], 1).unwrap();
        bot.start(Side::BUY, 20).unwrap();

        // Slice 1: 101 then the replenished 100.5 → 100.75
        let avg = bot.estimate(&book, Price::from_u64(100), 1, 1);
        assert_eq!(avg, Some(Decimal::new(10075, 2)));
        assert_eq!(bot.next_slice(&book, Price::from_u64(100), 1), Some(1));
        assert_eq!(book.ask_levels(), before);
    }

    #[test]
    fn test_lookahead_sell_picks_highest_average() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::BUY, &[(99, 2), (90, 100)]);
        seed_side(&mut book, Side::SELL, &[(101, 100)]);

        let mut bot = GreedyLookaheadBot::new(AgentId::new(8), 2, vec![1, 2, 10], 1).unwrap();
        bot.start(Side::SELL, 20).unwrap();

        assert_eq!(bot.estimate(&book, Price::from_u64(100), 1, 1), Some(Decimal::new(9925, 2)));
        assert_eq!(bot.next_slice(&book, Price::from_u64(100), 1), Some(1));
    }

    #[test]
    fn test_lookahead_executes_through_trait() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 50)]);
        seed_side(&mut book, Side::BUY, &[(99, 50)]);
        let mut bot = GreedyLookaheadBot::new(AgentId::new(8), 3, vec![2, 4], 1).unwrap();
        bot.start(Side::BUY, 6).unwrap();

        let reports = sweep_tick(&mut bot, &mut book, 1);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].executed > 0);
        assert_eq!(bot.executions().len(), 1);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(GreedyAdaptiveBot::new(AgentId::new(1), vec![], 1, 10).is_err());
        assert!(GreedyAdaptiveBot::new(AgentId::new(1), vec![0, 1], 1, 10).is_err());
        assert!(GreedyLookaheadBot::new(AgentId::new(1), 0, vec![1], 1).is_err());
        assert!(GreedyLookaheadBot::new(AgentId::new(1), 2, DEFAULT_CANDIDATES.to_vec(), 1).is_ok());
    }
}
