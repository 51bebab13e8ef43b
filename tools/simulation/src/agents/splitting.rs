//! Order-splitting execution bots
//!
//! Work a parent order as a series of market sweeps, one per tick.
//! `SplittingBot` slices evenly over time (TWAP); `AdaptiveSplittingBot`
//! sizes each slice from the liquidity visible at the best opposite level.

use matching_engine::{OrderBook, SweepReport};
use serde::{Deserialize, Serialize};
use types::errors::ConfigError;
use types::ids::{AgentId, Tick};
use types::numeric::{Price, Quantity};
use types::order::{Side, SweepRequest};

use super::{AgentAction, TradingAgent};

/// The order an execution bot is working
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentOrder {
    pub side: Side,
    pub total: Quantity,
    pub remaining: Quantity,
}

impl ParentOrder {
    pub fn new(side: Side, total: Quantity) -> Result<Self, ConfigError> {
        if total == 0 {
            return Err(ConfigError::invalid("total", "parent order must be positive"));
        }
        Ok(Self {
            side,
            total,
            remaining: total,
        })
    }

    pub fn executed(&self) -> Quantity {
        self.total - self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub(crate) fn apply(&mut self, report: &SweepReport) {
        self.remaining -= report.executed.min(self.remaining);
    }
}

/// TWAP splitting bot
#[derive(Debug, Clone)]
pub struct SplittingBot {
    id: AgentId,
    name: String,
    /// Fixed slice size; overrides the slice count given to `start`
    slice_size: Option<Quantity>,
    parent: Option<ParentOrder>,
    slices: u64,
    slices_done: u64,
    active: bool,
    executions: Vec<SweepReport>,
}

impl SplittingBot {
    pub fn new(id: AgentId, slice_size: Option<Quantity>) -> Result<Self, ConfigError> {
        if slice_size == Some(0) {
            return Err(ConfigError::invalid("slice_size", "must be positive"));
        }
        Ok(Self {
            id,
            name: format!("twap-{}", id.as_u32()),
            slice_size,
            parent: None,
            slices: 0,
            slices_done: 0,
            active: false,
            executions: Vec::new(),
        })
    }

    /// Begin working `total` on `side`. Without a fixed slice size the order
    /// is split into `slices` parts (default: one unit per slice).
    pub fn start(&mut self, side: Side, total: Quantity, slices: Option<u64>) -> Result<(), ConfigError> {
        let parent = ParentOrder::new(side, total)?;
        self.slices = match self.slice_size {
            Some(size) => ((total + size / 2) / size).max(1),
            None => slices.unwrap_or(total).max(1),
        };
        self.parent = Some(parent);
        self.slices_done = 0;
        self.active = true;
        self.executions.clear();
        Ok(())
    }

    /// Quantity of the next slice, None when idle
    pub fn next_slice(&self) -> Option<Quantity> {
        let parent = self.parent.filter(|_| self.active)?;
        let slices_left = self.slices.saturating_sub(self.slices_done).max(1);
        let slice = self
            .slice_size
            .unwrap_or_else(|| parent.remaining.div_ceil(slices_left))
            .min(parent.remaining);
        (slice > 0).then_some(slice)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn parent(&self) -> Option<&ParentOrder> {
        self.parent.as_ref()
    }

    pub fn executions(&self) -> &[SweepReport] {
        &self.executions
    }
}

impl TradingAgent for SplittingBot {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, _tick: Tick, _true_price: Price, _book: &OrderBook) -> AgentAction {
        match (self.parent, self.next_slice()) {
            (Some(parent), Some(quantity)) => AgentAction::sweep(SweepRequest {
                side: parent.side,
                quantity,
            }),
            _ => AgentAction::none(),
        }
    }

    fn on_sweep(&mut self, report: &SweepReport) {
        let Some(parent) = self.parent.as_mut() else {
            return;
        };
        parent.apply(report);
        self.slices_done += 1;
        self.executions.push(report.clone());
        if parent.is_complete() || self.slices_done >= self.slices {
            self.active = false;
        }
    }
}

/// Splitting bot that sizes slices from visible depth
#[derive(Debug, Clone)]
pub struct AdaptiveSplittingBot {
    id: AgentId,
    name: String,
    /// Fraction of best-level liquidity to take, in (0, 1]
    aggressiveness: f64,
    min_slice: Quantity,
    max_slice: Quantity,
    parent: Option<ParentOrder>,
    executions: Vec<SweepReport>,
}

impl AdaptiveSplittingBot {
    pub fn new(
        id: AgentId,
        aggressiveness: f64,
        min_slice: Quantity,
        max_slice: Quantity,
    ) -> Result<Self, ConfigError> {
        if !(aggressiveness > 0.0 && aggressiveness <= 1.0) {
            return Err(ConfigError::invalid("aggressiveness", "must be within (0, 1]"));
        }
        if min_slice == 0 || min_slice > max_slice {
            return Err(ConfigError::invalid("min_slice", "must satisfy 0 < min_slice <= max_slice"));
        }
        Ok(Self {
            id,
            name: format!("adaptive-splitter-{}", id.as_u32()),
            aggressiveness,
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

    /// Slice size given the current book, None when idle
    pub fn next_slice(&self, book: &OrderBook) -> Option<Quantity> {
        let parent = self.parent.filter(|p| !p.is_complete())?;
        let visible = best_opposite_quantity(book, parent.side);
        let scaled = (self.aggressiveness * visible as f64).floor() as Quantity;
        Some(scaled.max(self.min_slice).min(self.max_slice).min(parent.remaining))
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

/// Quantity resting at the best level a sweep on `side` would hit
pub(crate) fn best_opposite_quantity(book: &OrderBook, side: Side) -> Quantity {
    let levels = match side {
        Side::BUY => book.depth_snapshot(1).asks,
        Side::SELL => book.depth_snapshot(1).bids,
    };
    levels.first().map_or(0, |&(_, quantity)| quantity)
}

impl TradingAgent for AdaptiveSplittingBot {
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

    // An empty sweep leaves the parent active for the next tick
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
    fn test_twap_even_slices() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 100)]);
        let mut bot = SplittingBot::new(AgentId::new(5), None).unwrap();
        bot.start(Side::BUY, 10, Some(5)).unwrap();

        for tick in 1..=5 {
            let reports = sweep_tick(&mut bot, &mut book, tick);
            assert_eq!(reports[0].executed, 2);
        }
        assert!(!bot.is_active());
        assert_eq!(bot.executions().len(), 5);
        assert_eq!(bot.parent().map(|p| p.remaining), Some(0));
        assert!(sweep_tick(&mut bot, &mut book, 6).is_empty());
    }

    #[test]
    fn test_twap_uneven_total_completes() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::BUY, &[(99, 100)]);
        let mut bot = SplittingBot::new(AgentId::new(5), None).unwrap();
        bot.start(Side::SELL, 10, Some(3)).unwrap();

        let sizes: Vec<Quantity> = (1..=3)
            .map(|tick| sweep_tick(&mut bot, &mut book, tick)[0].executed)
            .collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert!(!bot.is_active());
    }

    #[test]
    fn test_fixed_slice_size_sets_count() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 100)]);
        let mut bot = SplittingBot::new(AgentId::new(5), Some(3)).unwrap();
        bot.start(Side::BUY, 10, Some(100)).unwrap();

        // round(10 / 3) = 3 slices of 3
        for tick in 1..=3 {
            assert_eq!(sweep_tick(&mut bot, &mut book, tick)[0].executed, 3);
        }
        assert!(!bot.is_active());
        assert_eq!(bot.parent().map(|p| p.remaining), Some(1));
    }

    #[test]
    fn test_twap_stops_after_slice_count_on_thin_book() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 1)]);
        let mut bot = SplittingBot::new(AgentId::new(5), None).unwrap();
        bot.start(Side::BUY, 4, Some(2)).unwrap();

        sweep_tick(&mut bot, &mut book, 1);
        sweep_tick(&mut bot, &mut book, 2);
        assert!(!bot.is_active());
        assert_eq!(bot.parent().map(|p| p.executed()), Some(1));
    }

    #[test]
    fn test_start_rejects_zero_total() {
        let mut bot = SplittingBot::new(AgentId::new(5), None).unwrap();
        assert!(bot.start(Side::BUY, 0, None).is_err());
        assert!(SplittingBot::new(AgentId::new(5), Some(0)).is_err());
    }

    #[test]
    fn test_adaptive_scales_with_best_level() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::SELL, &[(101, 8), (102, 50)]);
        let mut bot = AdaptiveSplittingBot::new(AgentId::new(6), 0.5, 1, 10).unwrap();
        bot.start(Side::BUY, 20).unwrap();

        // Half of the 8 visible at 101
        assert_eq!(bot.next_slice(&book), Some(4));
        sweep_tick(&mut bot, &mut book, 1);
        // 4 left at 101
        assert_eq!(bot.next_slice(&book), Some(2));
    }

    #[test]
    fn test_adaptive_bounds() {
        let mut book = OrderBook::new();
        seed_side(&mut book, Side::BUY, &[(99, 1_000)]);
        let mut bot = AdaptiveSplittingBot::new(AgentId::new(6), 1.0, 2, 10).unwrap();
        bot.start(Side::SELL, 15).unwrap();

        assert_eq!(bot.next_slice(&book), Some(10));
        sweep_tick(&mut bot, &mut book, 1);
        assert_eq!(bot.next_slice(&book), Some(5));
        sweep_tick(&mut bot, &mut book, 2);
        assert!(!bot.is_active());
        assert_eq!(bot.next_slice(&book), None);
    }

    #[test]
    fn test_adaptive_empty_book_uses_min_slice_and_stays_active() {
        let mut book = OrderBook::new();
        let mut bot = AdaptiveSplittingBot::new(AgentId::new(6), 0.5, 2, 10).unwrap();
        bot.start(Side::BUY, 5).unwrap();

        let reports = sweep_tick(&mut bot, &mut book, 1);
        assert_eq!(reports[0].requested, 2);
        assert_eq!(reports[0].executed, 0);
        assert!(bot.is_active());
    }

    #[test]
    fn test_adaptive_rejects_bad_parameters() {
        assert!(AdaptiveSplittingBot::new(AgentId::new(6), 0.0, 1, 10).is_err());
        assert!(AdaptiveSplittingBot::new(AgentId::new(6), 0.5, 11, 10).is_err());
        assert!(AdaptiveSplittingBot::new(AgentId::new(6), 0.5, 0, 10).is_err());
    }
}
