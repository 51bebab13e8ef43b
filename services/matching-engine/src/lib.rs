//! Matching Engine
//!
//! Single-security limit order book with price-time priority matching.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Executions happen at the resting order's price
//! - No crossed book persists after `submit` returns
//! - Conservation of quantity
//! - Deterministic matching (same inputs → same outputs)

pub mod book;
pub mod matching;
pub mod order_book;

pub use order_book::{BookDepth, OrderBook, SnapshotOrder, SweepEstimate, SweepReport, SNAPSHOT_OWNER};
