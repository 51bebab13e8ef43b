//! Market maker bot — symmetric quoting around the true price
//!
//! Each tick the maker pulls its resting quotes and re-posts a bid at
//! `true - half_spread` and an ask at `true + half_spread`. Optional seeded
//! jitter perturbs both quotes independently.

use matching_engine::OrderBook;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::ConfigError;
use types::ids::{AgentId, Tick};
use types::numeric::{Price, Quantity};
use types::order::OrderRequest;
use types::trade::Trade;

use super::{offset, AgentAction, TradingAgent};
use crate::price::MAX_STEP_SCALE;

/// Decimal places jittered quotes are rounded to
const QUOTE_DP: u32 = 8;

/// Configuration for the market maker bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMakerConfig {
    /// Distance from the true price to each quote
    pub half_spread: Decimal,
    /// Size of each quote
    pub quote_size: Quantity,
    /// Standard deviation of the noise added to each quote (0 = none)
    pub jitter: f64,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            half_spread: Decimal::new(5, 1),
            quote_size: 1,
            jitter: 0.0,
        }
    }
}

impl MarketMakerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_spread <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveSpread(self.half_spread.to_string()));
        }
        if self.quote_size == 0 {
            return Err(ConfigError::ZeroQuoteSize);
        }
        if !(self.jitter.is_finite() && (0.0..=MAX_STEP_SCALE).contains(&self.jitter)) {
            return Err(ConfigError::invalid("jitter", format!("must be within 0..={MAX_STEP_SCALE}")));
        }
        Ok(())
    }
}

/// Market maker bot state.
#[derive(Debug, Clone)]
pub struct MarketMaker {
    id: AgentId,
    name: String,
    config: MarketMakerConfig,
    /// Net position (positive = long)
    inventory: i64,
    cash: Decimal,
    quotes_posted: u64,
    rng: ChaCha8Rng,
}

impl MarketMaker {
    /// Create a new market maker with a deterministic seed.
    pub fn new(id: AgentId, config: MarketMakerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            name: format!("market-maker-{}", id.as_u32()),
            config,
            inventory: 0,
            cash: Decimal::ZERO,
            quotes_posted: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Bid and ask for the given true price. The bid is always below the ask.
    pub fn quotes(&mut self, true_price: Price) -> (Decimal, Decimal) {
        let center = true_price.as_decimal();
        let bid = center - self.config.half_spread;
        let ask = center + self.config.half_spread;
        if self.config.jitter == 0.0 {
            return (bid, ask);
        }

        let bid_noise: f64 = self.rng.sample(StandardNormal);
        let ask_noise: f64 = self.rng.sample(StandardNormal);
        let jittered_bid = bid + offset(bid_noise * self.config.jitter, QUOTE_DP);
        let jittered_ask = ask + offset(ask_noise * self.config.jitter, QUOTE_DP);

        if jittered_bid < jittered_ask {
            (jittered_bid, jittered_ask)
        } else {
            (bid, ask)
        }
    }

    pub fn config(&self) -> &MarketMakerConfig {
        &self.config
    }

    pub fn inventory(&self) -> i64 {
        self.inventory
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn quotes_posted(&self) -> u64 {
        self.quotes_posted
    }

    /// Cash plus inventory valued at `price`
    pub fn mark_to_market(&self, price: Price) -> Decimal {
        self.cash + Decimal::from(self.inventory) * price.as_decimal()
    }
}

impl TradingAgent for MarketMaker {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, _tick: Tick, true_price: Price, book: &OrderBook) -> AgentAction {
        let cancels = book.orders_of(self.id).iter().map(|o| o.order_id).collect();

        let (bid, ask) = self.quotes(true_price);
        let mut orders = Vec::with_capacity(2);
        // A quote that would be non-positive is skipped for this tick
        if let Some(price) = Price::try_new(bid) {
            orders.push(OrderRequest::buy(price, self.config.quote_size));
        }
        if let Some(price) = Price::try_new(ask) {
            orders.push(OrderRequest::sell(price, self.config.quote_size));
        }
        self.quotes_posted += orders.len() as u64;

        AgentAction {
            orders,
            cancels,
            sweeps: Vec::new(),
        }
    }

    fn on_fill(&mut self, trade: &Trade) {
        let quantity = trade.quantity as i64;
        let value = trade.trade_value();
        if trade.buyer == self.id {
            self.inventory += quantity;
            self.cash -= value;
        }
        if trade.seller == self.id {
            self.inventory -= quantity;
            self.cash += value;
        }
    }
}
