//! Price impact curve
//!
//! Expected slippage in basis points against the mid price for a range of
//! market order sizes, estimated on the current book without touching it.

use matching_engine::OrderBook;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::Quantity;
use types::order::Side;

/// One point of the curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactPoint {
    pub size: Quantity,
    /// Quantity the book could actually absorb
    pub fillable: Quantity,
    pub vwap: Option<Decimal>,
    pub impact_bps: Decimal,
}

/// Impact of a market order on `side` for each of `sizes`.
pub fn curve(book: &OrderBook, side: Side, sizes: &[Quantity]) -> Vec<ImpactPoint> {
    sizes
        .iter()
        .map(|&size| {
            let estimate = book.simulate_market(side, size);
            ImpactPoint {
                size,
                fillable: estimate.executed,
                vwap: estimate.vwap,
                impact_bps: book.price_impact_bps(side, size),
            }
        })
        .collect()
}

/// `points` sizes spaced evenly from `min_size` to `max_size` inclusive,
/// truncated to whole units with duplicates removed.
pub fn linear_sizes(min_size: Quantity, max_size: Quantity, points: usize) -> Vec<Quantity> {
    if points == 0 || max_size < min_size {
        return Vec::new();
    }
    if points == 1 {
        return vec![min_size];
    }

    let step = (max_size - min_size) as f64 / (points - 1) as f64;
    let mut sizes: Vec<Quantity> = (0..points)
        .map(|i| min_size + (step * i as f64) as Quantity)
        .collect();
    sizes.dedup();
    sizes
}
