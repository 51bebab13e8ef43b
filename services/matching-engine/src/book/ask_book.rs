//! Ask (sell-side) order book
//!
//! Maintains sell orders sorted by price ascending (best ask first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Ask (sell) side order book
///
/// Orders are sorted by price ascending, so the lowest ask is first.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    /// Price levels sorted ascending (lowest price first)
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an order at its price level in time priority
    pub fn insert(&mut self, order: &Order) {
        let level = self.levels.entry(order.price).or_default();
        level.insert(order.order_id, order.tick, order.remaining);
    }

    /// Remove a resting order from the ask book
    ///
    /// Returns true if the order was found and removed
    pub fn remove(&mut self, order: &Order) -> bool {
        let Some(level) = self.levels.get_mut(&order.price) else {
            return false;
        };
        if !level.remove(&order.order_id, order.remaining) {
            return false;
        }
        if level.is_empty() {
            self.levels.remove(&order.price);
        }
        true
    }

    /// Get the best ask price (lowest)
    pub fn best_ask_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Get mutable reference to the best ask level
    pub(crate) fn best_ask_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels.iter_mut().next().map(|(price, level)| (*price, level))
    }

    pub(crate) fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Price levels best first (lowest price first)
    pub fn levels(&self) -> impl Iterator<Item = (Price, &PriceLevel)> {
        self.levels.iter().map(|(price, level)| (*price, level))
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels()
            .take(depth)
            .map(|(price, level)| (price, level.total_quantity()))
            .collect()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.levels.values().map(PriceLevel::total_quantity).sum()
    }

    /// Check if the ask book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{AgentId, OrderId};
    use types::order::Side;

    fn ask(id: u64, price: u64, qty: Quantity) -> Order {
        Order::new(OrderId::new(id), AgentId::new(0), Side::SELL, Price::from_u64(price), qty, 1)
    }

    #[test]
    fn test_ask_book_best_ask() {
        let mut book = AskBook::new();
        book.insert(&ask(1, 50000, 1));
        book.insert(&ask(2, 51000, 2));
        book.insert(&ask(3, 49000, 3));

        assert_eq!(book.best_ask_price(), Some(Price::from_u64(49000)));
    }

    #[test]
    fn test_ask_book_remove_keeps_other_orders() {
        let mut book = AskBook::new();
        let first = ask(1, 50000, 1);
        let second = ask(2, 50000, 4);
        book.insert(&first);
        book.insert(&second);

        assert!(book.remove(&first));
        assert_eq!(book.level_count(), 1);
        assert_eq!(book.total_quantity(), 4);
    }

    #[test]
    fn test_ask_book_depth_snapshot() {
        let mut book = AskBook::new();
        book.insert(&ask(1, 50000, 1));
        book.insert(&ask(2, 51000, 2));
        book.insert(&ask(3, 49000, 1));
        book.insert(&ask(4, 52000, 5));

        let depth = book.depth_snapshot(2);

        // Lowest prices first
        assert_eq!(depth, vec![(Price::from_u64(49000), 1), (Price::from_u64(50000), 1)]);
    }

    #[test]
    fn test_remove_level_if_empty_keeps_live_levels() {
        let mut book = AskBook::new();
        book.insert(&ask(1, 50000, 1));
        book.remove_level_if_empty(Price::from_u64(50000));
        assert_eq!(book.level_count(), 1);
    }
}
