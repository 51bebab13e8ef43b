//! Order book core
//!
//! Owns every resting order in an arena keyed by `OrderId`; the bid and ask
//! books only index those ids by price in FIFO queues. All mutation goes
//! through `submit`, `execute_market` and `cancel`, so no partially matched
//! state is observable between calls.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};
use types::errors::OrderError;
use types::ids::{AgentId, OrderId, Tick};
use types::numeric::{Price, Quantity, BPS_PER_UNIT};
use types::order::{Order, OrderStatus, Side};
use types::trade::{Counterparty, Trade};

use crate::book::{AskBook, BidBook};
use crate::matching::{crossing, MatchExecutor};

/// Single-security limit order book
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Live (resting) orders
    orders: BTreeMap<OrderId, Order>,
    /// Final status of orders that have left the book
    closed: BTreeMap<OrderId, OrderStatus>,
    bids: BidBook,
    asks: AskBook,
    /// Trade id sequence
    executor: MatchExecutor,
    next_order_id: u64,
}

/// Outcome of a market sweep that was executed against the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub order_id: OrderId,
    pub owner: AgentId,
    pub side: Side,
    pub requested: Quantity,
    pub executed: Quantity,
    /// Volume-weighted execution price, None if nothing filled
    pub vwap: Option<Decimal>,
    pub trades: Vec<Trade>,
}

impl SweepReport {
    pub fn unfilled(&self) -> Quantity {
        self.requested - self.executed
    }
}

/// Outcome of a sweep simulated against the current book without mutating it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEstimate {
    pub side: Side,
    pub requested: Quantity,
    pub executed: Quantity,
    /// Sum of price × quantity over the simulated fills
    pub cost: Decimal,
    pub vwap: Option<Decimal>,
}

impl SweepEstimate {
    pub fn unfilled(&self) -> Quantity {
        self.requested - self.executed
    }
}

/// Owner of snapshot liquidity that carries no owner of its own
pub const SNAPSHOT_OWNER: AgentId = AgentId::new(0);

/// One resting order of a depth snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOrder {
    pub side: Side,
    pub price: Price,
    pub size: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<AgentId>,
}

/// Aggregated depth, best level first on each side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDepth {
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

fn vwap(cost: Decimal, executed: Quantity) -> Option<Decimal> {
    (executed > 0).then(|| cost / Decimal::from(executed))
}

impl OrderBook {
    /// Build a book from a depth snapshot
    ///
    /// Each entry rests at tick 0 under a fresh id, in the given order.
    /// Entries that cross the opposite side match as they are loaded.
    pub fn from_snapshot(snapshot: &[SnapshotOrder]) -> Result<Self, OrderError> {
        let mut book = Self::new();
        for entry in snapshot {
            let id = book.next_order_id();
            let owner = entry.owner.unwrap_or(SNAPSHOT_OWNER);
            book.submit(Order::new(id, owner, entry.side, entry.price, entry.size, 0))?;
        }
        debug!(orders = book.order_count(), bids = book.bid_depth(), asks = book.ask_depth(), "Loaded snapshot");
        Ok(book)
    }

    /// Create an empty book. Order and trade ids both start at 1.
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            closed: BTreeMap::new(),
            bids: BidBook::new(),
            asks: AskBook::new(),
            executor: MatchExecutor::new(1),
            next_order_id: 1,
        }
    }

    /// Reserve a fresh order id from the book's sequence
    ///
    /// The sequence stops at `OrderId::MAX`, which `submit` rejects.
    pub fn next_order_id(&mut self) -> OrderId {
        let id = OrderId::new(self.next_order_id);
        self.next_order_id = self.next_order_id.saturating_add(1);
        id
    }

    /// Keep the sequence ahead of externally assigned ids
    fn claim_id(&mut self, order_id: OrderId) {
        if order_id.as_u64() >= self.next_order_id {
            self.next_order_id = order_id.as_u64().saturating_add(1);
        }
    }

    fn check_unused(&self, order_id: OrderId) -> Result<(), OrderError> {
        if order_id == OrderId::MAX {
            return Err(OrderError::InvalidOrderId(format!("{order_id} is past the end of the id sequence")));
        }
        if self.orders.contains_key(&order_id) || self.closed.contains_key(&order_id) {
            return Err(OrderError::DuplicateOrderId {
                order_id: order_id.to_string(),
            });
        }
        Ok(())
    }

    /// Submit a limit order
    ///
    /// Matches against the opposite side with price-time priority, executing
    /// at the resting order's price, and rests any remainder. Returns the
    /// trades in execution order. A rejected order leaves the book unchanged.
    pub fn submit(&mut self, order: Order) -> Result<Vec<Trade>, OrderError> {
        if !order.price.is_positive() {
            debug!(order_id = %order.order_id, price = %order.price, "Rejecting order with non-positive price");
            return Err(OrderError::InvalidPrice(order.price.to_string()));
        }
        if order.quantity == 0 {
            debug!(order_id = %order.order_id, "Rejecting order with zero quantity");
            return Err(OrderError::InvalidQuantity("quantity must be positive".to_string()));
        }
        self.check_unused(order.order_id)?;
        self.claim_id(order.order_id);

        // Start from a clean fill state whatever the caller passed in
        let mut order = Order::new(
            order.order_id,
            order.owner,
            order.side,
            order.price,
            order.quantity,
            order.tick,
        );
        let taker = Counterparty {
            order_id: order.order_id,
            owner: order.owner,
        };

        let mut remaining = order.quantity;
        let trades = self.match_incoming(order.side, taker, Some(order.price), &mut remaining, order.tick);
        if remaining < order.quantity {
            order.add_fill(order.quantity - remaining);
        }

        debug!(
            order_id = %order.order_id,
            owner = %order.owner,
            side = ?order.side,
            price = %order.price,
            quantity = order.quantity,
            trades = trades.len(),
            resting = order.remaining,
            "Order accepted"
        );

        if order.is_filled() {
            self.closed.insert(order.order_id, OrderStatus::Filled);
        } else {
            match order.side {
                Side::BUY => self.bids.insert(&order),
                Side::SELL => self.asks.insert(&order),
            }
            self.orders.insert(order.order_id, order);
        }

        debug_assert!(!self.is_crossed(), "book crossed after submit");
        Ok(trades)
    }

    /// Execute a market sweep: take up to `quantity` from the opposite side,
    /// best price first. Nothing rests; the unfilled remainder is dropped.
    pub fn execute_market(
        &mut self,
        order_id: OrderId,
        owner: AgentId,
        side: Side,
        quantity: Quantity,
        tick: Tick,
    ) -> Result<SweepReport, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity("quantity must be positive".to_string()));
        }
        self.check_unused(order_id)?;
        self.claim_id(order_id);

        let taker = Counterparty { order_id, owner };
        let mut remaining = quantity;
        let trades = self.match_incoming(side, taker, None, &mut remaining, tick);

        let executed = quantity - remaining;
        let cost: Decimal = trades.iter().map(Trade::trade_value).sum();
        let status = if remaining == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::Cancelled
        };
        self.closed.insert(order_id, status);

        debug!(
            order_id = %order_id,
            owner = %owner,
            side = ?side,
            requested = quantity,
            executed,
            "Market sweep executed"
        );

        Ok(SweepReport {
            order_id,
            owner,
            side,
            requested: quantity,
            executed,
            vwap: vwap(cost, executed),
            trades,
        })
    }

    /// Match an incoming order against the opposite side
    ///
    /// `limit` of None sweeps without a price bound. Consumes from
    /// `remaining` and from the resting orders, removing any that fill.
    fn match_incoming(
        &mut self,
        side: Side,
        taker: Counterparty,
        limit: Option<Price>,
        remaining: &mut Quantity,
        tick: Tick,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();

        while *remaining > 0 {
            let best = match side {
                Side::BUY => self.asks.best_ask_level_mut(),
                Side::SELL => self.bids.best_bid_level_mut(),
            };
            let Some((level_price, level)) = best else {
                break;
            };
            if let Some(limit) = limit {
                if !crossing::incoming_can_match(side, limit, level_price) {
                    break;
                }
            }
            let Some(maker_id) = level.front() else {
                break;
            };
            let Some(maker) = self.orders.get_mut(&maker_id) else {
                // Queue entry without an arena order; cannot happen through the public API
                level.pop_front();
                continue;
            };

            let fill = (*remaining).min(maker.remaining);
            let maker_party = Counterparty {
                order_id: maker.order_id,
                owner: maker.owner,
            };
            maker.add_fill(fill);
            let maker_done = maker.is_filled();
            level.reduce(fill);
            *remaining -= fill;

            let trade = self
                .executor
                .execute_trade(side, maker_party, taker, level_price, fill, tick);
            trace!(
                trade_id = %trade.trade_id,
                maker = %maker_id,
                taker = %taker.order_id,
                price = %level_price,
                quantity = fill,
                "Fill"
            );
            trades.push(trade);

            if maker_done {
                level.pop_front();
                self.orders.remove(&maker_id);
                self.closed.insert(maker_id, OrderStatus::Filled);
                match side {
                    Side::BUY => self.asks.remove_level_if_empty(level_price),
                    Side::SELL => self.bids.remove_level_if_empty(level_price),
                }
            }
        }

        trades
    }

    /// Cancel a resting order
    ///
    /// Returns whether a removal occurred. Unknown, filled and already
    /// cancelled ids are a no-op returning false.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        self.remove_resting(order_id).is_some()
    }

    /// Cancel a resting order that the caller requires to exist
    pub fn cancel_existing(&mut self, order_id: OrderId) -> Result<Order, OrderError> {
        self.remove_resting(order_id).ok_or_else(|| OrderError::NotFound {
            order_id: order_id.to_string(),
        })
    }

    fn remove_resting(&mut self, order_id: OrderId) -> Option<Order> {
        let mut order = self.orders.remove(&order_id)?;
        let removed = match order.side {
            Side::BUY => self.bids.remove(&order),
            Side::SELL => self.asks.remove(&order),
        };
        debug_assert!(removed, "arena order missing from its side book");

        order.status = OrderStatus::Cancelled;
        self.closed.insert(order_id, OrderStatus::Cancelled);
        debug!(order_id = %order_id, owner = %order.owner, remaining = order.remaining, "Order cancelled");
        Some(order)
    }

    /// Simulate a market sweep without touching the book
    pub fn simulate_market(&self, side: Side, quantity: Quantity) -> SweepEstimate {
        let levels = match side {
            Side::BUY => self.ask_levels(),
            Side::SELL => self.bid_levels(),
        };

        let mut left = quantity;
        let mut cost = Decimal::ZERO;
        for (price, available) in levels {
            if left == 0 {
                break;
            }
            let take = left.min(available);
            cost += price.as_decimal() * Decimal::from(take);
            left -= take;
        }

        let executed = quantity - left;
        SweepEstimate {
            side,
            requested: quantity,
            executed,
            cost,
            vwap: vwap(cost, executed),
        }
    }

    /// Slippage of a simulated sweep against the mid price, in basis points
    ///
    /// Positive means worse than mid. Zero when either side is empty or
    /// nothing would fill.
    pub fn price_impact_bps(&self, side: Side, quantity: Quantity) -> Decimal {
        let Some(mid) = self.mid_price() else {
            return Decimal::ZERO;
        };
        let Some(avg) = self.simulate_market(side, quantity).vwap else {
            return Decimal::ZERO;
        };

        let bps = Decimal::from(BPS_PER_UNIT);
        match side {
            Side::BUY => (avg / mid - Decimal::ONE) * bps,
            Side::SELL => (Decimal::ONE - avg / mid) * bps,
        }
    }

    /// Highest resting bid price, None when there are no bids
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_bid_price()
    }

    /// Lowest resting ask price, None when there are no asks
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_ask_price()
    }

    /// Best ask minus best bid, None unless both sides are quoted
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        }
    }

    /// Get mid price (average of best bid and ask).
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(Price::midpoint(bid, ask)),
            _ => None,
        }
    }

    /// Bid levels as (price, quantity), highest first
    pub fn bid_levels(&self) -> Vec<(Price, Quantity)> {
        self.bids.depth_snapshot(usize::MAX)
    }

    /// Ask levels as (price, quantity), lowest first
    pub fn ask_levels(&self) -> Vec<(Price, Quantity)> {
        self.asks.depth_snapshot(usize::MAX)
    }

    /// Top `depth` levels of each side
    pub fn depth_snapshot(&self, depth: usize) -> BookDepth {
        BookDepth {
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    /// Resting bids in priority order (price desc, then arrival)
    pub fn bid_orders(&self) -> Vec<&Order> {
        self.bids
            .levels()
            .flat_map(|(_, level)| level.iter())
            .filter_map(|id| self.orders.get(id))
            .collect()
    }

    /// Resting asks in priority order (price asc, then arrival)
    pub fn ask_orders(&self) -> Vec<&Order> {
        self.asks
            .levels()
            .flat_map(|(_, level)| level.iter())
            .filter_map(|id| self.orders.get(id))
            .collect()
    }

    /// Resting orders owned by `owner`, in id order
    pub fn orders_of(&self, owner: AgentId) -> Vec<&Order> {
        self.orders.values().filter(|o| o.owner == owner).collect()
    }

    /// A resting order by id
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Current status of any order this book has accepted
    pub fn status(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.orders
            .get(&order_id)
            .map(|o| o.status)
            .or_else(|| self.closed.get(&order_id).copied())
    }

    /// Total number of resting orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total resting bid quantity
    pub fn bid_depth(&self) -> Quantity {
        self.bids.total_quantity()
    }

    /// Total resting ask quantity
    pub fn ask_depth(&self) -> Quantity {
        self.asks.total_quantity()
    }

    /// Number of trades executed so far
    pub fn trade_count(&self) -> u64 {
        self.executor.peek_sequence() - 1
    }

    /// Whether best bid >= best ask. Never true between public calls.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => crossing::can_match(bid, ask),
            _ => false,
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
