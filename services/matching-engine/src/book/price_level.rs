//! Price level implementation with FIFO queue
//!
//! A price level holds the ids of all resting orders at one price, ordered
//! by submission tick and then arrival. The orders themselves live in the book's arena; the level
//! only tracks queue position and the aggregate quantity for depth queries.

use std::collections::VecDeque;
use types::ids::{OrderId, Tick};
use types::numeric::Quantity;

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering for time-priority matching.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Queue of (order id, submission tick), tick ascending then FIFO
    orders: VecDeque<(OrderId, Tick)>,
    /// Total remaining quantity available at this level
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an order behind every order with the same or an earlier tick
    ///
    /// Callers normally submit in tick order, which makes this a push to the
    /// back; an order stamped with an older tick still takes its time slot.
    pub fn insert(&mut self, order_id: OrderId, tick: Tick, quantity: Quantity) {
        let position = self
            .orders
            .iter()
            .rposition(|&(_, queued)| queued <= tick)
            .map_or(0, |i| i + 1);
        self.orders.insert(position, (order_id, tick));
        self.total_quantity += quantity;
    }

    /// Remove an order from the queue by OrderId
    ///
    /// `remaining` is the order's current remaining quantity, which is taken
    /// off the level total. Returns false if the id is not queued here.
    pub fn remove(&mut self, order_id: &OrderId, remaining: Quantity) -> bool {
        let Some(position) = self.orders.iter().position(|(id, _)| id == order_id) else {
            return false;
        };
        self.orders.remove(position);
        self.total_quantity = self.total_quantity.saturating_sub(remaining);
        true
    }

    /// Peek at the front order without removing it
    pub fn front(&self) -> Option<OrderId> {
        self.orders.front().map(|&(id, _)| id)
    }

    /// Pop the front order from the queue
    ///
    /// Only called once the front order is fully filled, so the total has
    /// already been reduced by `reduce`.
    pub fn pop_front(&mut self) -> Option<OrderId> {
        self.orders.pop_front().map(|(id, _)| id)
    }

    /// Reduce the level total after a fill against one of its orders
    pub fn reduce(&mut self, filled: Quantity) {
        self.total_quantity = self.total_quantity.saturating_sub(filled);
    }

    /// Order ids in time priority
    pub fn iter(&self) -> impl Iterator<Item = &OrderId> {
        self.orders.iter().map(|(id, _)| id)
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_level_insert() {
        let mut level = PriceLevel::new();
        level.insert(OrderId::new(1), 1, 15);

        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), 15);
        assert!(!level.is_empty());
    }

    #[test]
    fn test_price_level_fifo_order() {
        let mut level = PriceLevel::new();
        level.insert(OrderId::new(1), 1, 1);
        level.insert(OrderId::new(2), 1, 2);
        level.insert(OrderId::new(3), 1, 3);

        assert_eq!(level.front(), Some(OrderId::new(1)));
        let queued: Vec<_> = level.iter().copied().collect();
        assert_eq!(queued, vec![OrderId::new(1), OrderId::new(2), OrderId::new(3)]);
    }

    #[test]
    fn test_price_level_remove() {
        let mut level = PriceLevel::new();
        level.insert(OrderId::new(1), 1, 1);
        level.insert(OrderId::new(2), 1, 2);

        assert!(level.remove(&OrderId::new(1), 1));
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), 2);
        assert_eq!(level.front(), Some(OrderId::new(2)));

        assert!(!level.remove(&OrderId::new(9), 5));
        assert_eq!(level.total_quantity(), 2);
    }

    #[test]
    fn test_price_level_reduce_then_pop() {
        let mut level = PriceLevel::new();
        level.insert(OrderId::new(1), 1, 5);
        level.insert(OrderId::new(2), 1, 4);

        // Partial fill of the front order
        level.reduce(3);
        assert_eq!(level.total_quantity(), 6);
        assert_eq!(level.order_count(), 2);

        // Front order completes
        level.reduce(2);
        assert_eq!(level.pop_front(), Some(OrderId::new(1)));
        assert_eq!(level.total_quantity(), 4);
        assert_eq!(level.front(), Some(OrderId::new(2)));
    }

    #[test]
    fn test_price_level_orders_by_tick_then_arrival() {
        let mut level = PriceLevel::new();
        level.insert(OrderId::new(1), 5, 1);
        level.insert(OrderId::new(2), 3, 1);
        level.insert(OrderId::new(3), 5, 1);
        level.insert(OrderId::new(4), 3, 1);

        let queued: Vec<_> = level.iter().copied().collect();
        assert_eq!(
            queued,
            vec![OrderId::new(2), OrderId::new(4), OrderId::new(1), OrderId::new(3)]
        );
        assert_eq!(level.total_quantity(), 4);
    }
}
