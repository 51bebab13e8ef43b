//! Single-Security Market Simulator
//!
//! A seeded random walk drives the "true" price; a population of trading
//! agents reads it each tick and trades through a shared price-time
//! priority order book. Everything is single-threaded and deterministic:
//! the same config and seed always yield the same histories.
//!
//! # Modules
//! - `price` — Seeded true price random walk
//! - `agents` — Trading agent contract and strategies
//! - `market` — Deterministic tick loop
//! - `config` — Serde run configuration and market builder
//! - `history` — Append-only price, trade and sweep history
//! - `metrics` — Order flow counters
//! - `reports` — Depth, price impact, and profitability reports
//! - `replay` — Deterministic replay validation
//! - `snapshot_runner` — Execution strategies replayed over depth snapshots

pub mod agents;
pub mod config;
pub mod history;
pub mod market;
pub mod metrics;
pub mod price;
pub mod replay;
pub mod reports;
pub mod snapshot_runner;

pub use agents::{AgentAction, TradingAgent};
pub use config::SimConfig;
pub use history::MarketHistory;
pub use market::{Market, TickSummary};
pub use price::{PriceProcess, PriceProcessConfig};
pub use snapshot_runner::{SnapshotRunner, StrategyResult};
