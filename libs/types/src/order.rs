//! Order lifecycle types
//!
//! States: RESTING -> PARTIALLY_FILLED -> FILLED, or RESTING/PARTIALLY_FILLED
//! -> CANCELLED. Only the matcher moves an order toward FILLED.

use crate::ids::{AgentId, OrderId, Tick};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// On the book, nothing filled yet
    Resting,
    /// On the book with some quantity executed
    PartiallyFilled,
    /// Completely executed (terminal)
    Filled,
    /// Removed by its owner (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    /// Whether a cancel is legal from this state
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Resting | OrderStatus::PartiallyFilled)
    }
}

/// A limit order
///
/// Fields other than `remaining` and `status` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub owner: AgentId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining: Quantity,
    pub tick: Tick,
    pub status: OrderStatus,
}

impl Order {
    /// Create a new, unfilled order
    pub fn new(
        order_id: OrderId,
        owner: AgentId,
        side: Side,
        price: Price,
        quantity: Quantity,
        tick: Tick,
    ) -> Self {
        Self {
            order_id,
            owner,
            side,
            price,
            quantity,
            remaining: quantity,
            tick,
            status: OrderStatus::Resting,
        }
    }

    /// Quantity executed so far
    pub fn filled(&self) -> Quantity {
        self.quantity - self.remaining
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Record an execution against this order
    ///
    /// # Panics
    /// Panics if the fill would exceed the remaining quantity
    pub fn add_fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity <= self.remaining,
            "Fill would exceed order quantity"
        );

        self.remaining -= fill_quantity;
        self.status = if self.remaining == 0 {
            OrderStatus::Filled
        } else if self.remaining < self.quantity {
            OrderStatus::PartiallyFilled
        } else {
            self.status
        };
    }
}

/// A limit order as emitted by an agent, before the market stamps
/// identity, owner and tick onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderRequest {
    pub fn buy(price: Price, quantity: Quantity) -> Self {
        Self { side: Side::BUY, price, quantity }
    }

    pub fn sell(price: Price, quantity: Quantity) -> Self {
        Self { side: Side::SELL, price, quantity }
    }

    pub fn into_order(self, order_id: OrderId, owner: AgentId, tick: Tick) -> Order {
        Order::new(order_id, owner, self.side, self.price, self.quantity, tick)
    }
}

/// A market (sweep) order request: take `quantity` from the opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRequest {
    pub side: Side,
    pub quantity: Quantity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(side: Side, price: u64, qty: Quantity) -> Order {
        Order::new(OrderId::new(1), AgentId::new(0), side, Price::from_u64(price), qty, 1)
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_order_fill_transitions() {
        let mut o = order(Side::BUY, 100, 10);
        assert_eq!(o.status, OrderStatus::Resting);

        o.add_fill(4);
        assert_eq!(o.status, OrderStatus::PartiallyFilled);
        assert_eq!(o.filled(), 4);
        assert_eq!(o.remaining, 6);

        o.add_fill(6);
        assert_eq!(o.status, OrderStatus::Filled);
        assert!(o.is_filled());
        assert!(o.status.is_terminal());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed order quantity")]
    fn test_order_overfill_panics() {
        let mut o = order(Side::SELL, 100, 3);
        o.add_fill(4);
    }

    #[test]
    fn test_cancellable_states() {
        assert!(OrderStatus::Resting.is_cancellable());
        assert!(OrderStatus::PartiallyFilled.is_cancellable());
        assert!(!OrderStatus::Filled.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    proptest::proptest! {
        #[test]
        fn fills_never_exceed_quantity(quantity in 1u64..1_000, cuts in proptest::collection::vec(1u64..100, 0..20)) {
            let mut o = order(Side::BUY, 100, quantity);
            for cut in cuts {
                let fill = cut.min(o.remaining);
                if fill == 0 {
                    break;
                }
                o.add_fill(fill);
                proptest::prop_assert_eq!(o.filled() + o.remaining, quantity);
                proptest::prop_assert_eq!(o.status == OrderStatus::Filled, o.remaining == 0);
            }
        }
    }

    #[test]
    fn test_request_into_order() {
        let req = OrderRequest::sell(Price::from_u64(51), 10);
        let o = req.into_order(OrderId::new(5), AgentId::new(2), 3);
        assert_eq!(o.order_id, OrderId::new(5));
        assert_eq!(o.owner, AgentId::new(2));
        assert_eq!(o.side, Side::SELL);
        assert_eq!(o.remaining, 10);
        assert_eq!(o.tick, 3);
    }
}
