//! Depth chart export
//!
//! Cumulative depth per side, best level first, as plotted by a depth
//! chart. Exported as JSON for external visualization.

use matching_engine::OrderBook;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::Tick;
use types::numeric::{Price, Quantity};

/// A single depth level for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
    /// Quantity at this level and every better one
    pub cumulative_quantity: Quantity,
}

/// Complete depth snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub tick: Tick,
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
    pub total_bid_depth: Quantity,
    pub total_ask_depth: Quantity,
    pub spread: Option<Decimal>,
    pub mid_price: Option<Decimal>,
}

fn cumulative(levels: Vec<(Price, Quantity)>) -> Vec<DepthLevel> {
    let mut running: Quantity = 0;
    levels
        .into_iter()
        .map(|(price, quantity)| {
            running += quantity;
            DepthLevel {
                price,
                quantity,
                cumulative_quantity: running,
            }
        })
        .collect()
}

/// Generate a depth snapshot from the book.
pub fn snapshot(book: &OrderBook, tick: Tick) -> DepthSnapshot {
    DepthSnapshot {
        tick,
        bids: cumulative(book.bid_levels()),
        asks: cumulative(book.ask_levels()),
        total_bid_depth: book.bid_depth(),
        total_ask_depth: book.ask_depth(),
        spread: book.spread(),
        mid_price: book.mid_price(),
    }
}

/// Export depth snapshot as JSON string.
pub fn export_json(book: &OrderBook, tick: Tick) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot(book, tick))
}
