//! Deterministic replay validation
//!
//! Same config, same seed → byte-identical price and trade histories. Two
//! markets are built from one config, run side by side, and their
//! serialized histories compared.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::errors::ConfigError;
use types::ids::Tick;
use types::numeric::Price;

use crate::config::SimConfig;
use crate::history::MarketHistory;
use crate::market::Market;

/// A snapshot of end-of-run state for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub ticks: Tick,
    pub final_price: Price,
    pub trade_count: usize,
    pub sweep_count: usize,
    pub resting_orders: usize,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
}

/// Capture a snapshot of the market state.
pub fn capture_snapshot(market: &Market) -> RunSnapshot {
    RunSnapshot {
        ticks: market.tick(),
        final_price: market.true_price(),
        trade_count: market.history().trades().len(),
        sweep_count: market.history().sweeps().len(),
        resting_orders: market.book().order_count(),
        best_bid: market.book().best_bid(),
        best_ask: market.book().best_ask(),
    }
}

/// Result of replay validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayValidation {
    pub matches: bool,
    /// Whether the serialized histories were byte-identical
    pub histories_identical: bool,
    /// First tick whose true price or trades differ
    pub first_divergence: Option<Tick>,
    pub original: RunSnapshot,
    pub replayed: RunSnapshot,
}

/// First tick at which two histories disagree
pub fn first_divergence(a: &MarketHistory, b: &MarketHistory) -> Option<Tick> {
    let price_tick = a
        .prices()
        .iter()
        .zip(b.prices())
        .position(|(x, y)| x != y)
        .map(|i| i as Tick);
    let trade_tick = a
        .trades()
        .iter()
        .zip(b.trades())
        .find(|(x, y)| x != y)
        .map(|(x, y)| x.tick.min(y.tick));

    let length_tick = if a.prices().len() != b.prices().len() {
        Some(a.prices().len().min(b.prices().len()) as Tick)
    } else if a.trades().len() != b.trades().len() {
        let shorter = a.trades().len().min(b.trades().len());
        a.trades()
            .get(shorter)
            .or_else(|| b.trades().get(shorter))
            .map(|t| t.tick)
    } else {
        None
    };

    [price_tick, trade_tick, length_tick].into_iter().flatten().min()
}

fn run(config: &SimConfig) -> Result<Market, ConfigError> {
    let mut market = config.build()?;
    market.run(config.ticks);
    Ok(market)
}

/// Run `config` twice and compare the results byte for byte.
pub fn validate_determinism(config: &SimConfig) -> Result<ReplayValidation, ConfigError> {
    let original = run(config)?;
    let replayed = run(config)?;

    let serialize = |history: &MarketHistory| history.to_json().map_err(|e| ConfigError::Parse(e.to_string()));
    let histories_identical = serialize(original.history())? == serialize(replayed.history())?;
    let first_divergence = first_divergence(original.history(), replayed.history());

    let original = capture_snapshot(&original);
    let replayed = capture_snapshot(&replayed);
    let matches = histories_identical && original == replayed;

    if matches {
        info!(seed = config.seed, ticks = config.ticks, trades = original.trade_count, "Replay matched");
    } else {
        warn!(seed = config.seed, divergence = ?first_divergence, "Replay diverged");
    }

    Ok(ReplayValidation {
        matches,
        histories_identical,
        first_divergence,
        original,
        replayed,
    })
}
