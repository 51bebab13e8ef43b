//! Noise trader bot
//!
//! Posts a Poisson-distributed number of random limit orders per tick,
//! scattered normally around the true price, with exponential sizes.

use matching_engine::OrderBook;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Poisson, StandardNormal};
use serde::{Deserialize, Serialize};
use types::errors::ConfigError;
use types::ids::{AgentId, Tick};
use types::numeric::{Price, Quantity};
use types::order::{OrderRequest, Side};

use super::{offset, AgentAction, TradingAgent};
use crate::price::MAX_STEP_SCALE;

/// Configuration for the noise trader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseTraderConfig {
    /// Mean number of orders per tick
    pub intensity: f64,
    /// Standard deviation of the order price around the true price
    pub spread: f64,
    /// Mean of the exponential part of the order size
    pub size_mean: f64,
    /// Decimal places order prices are rounded to
    pub price_dp: u32,
}

impl Default for NoiseTraderConfig {
    fn default() -> Self {
        Self {
            intensity: 2.0,
            spread: 2.0,
            size_mean: 1.0,
            price_dp: 2,
        }
    }
}

impl NoiseTraderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.intensity.is_finite() && self.intensity >= 0.0) {
            return Err(ConfigError::invalid("intensity", "must be finite and >= 0"));
        }
        if !(self.spread.is_finite() && self.spread > 0.0) {
            return Err(ConfigError::NonPositiveSpread(self.spread.to_string()));
        }
        if self.spread > MAX_STEP_SCALE {
            return Err(ConfigError::invalid("spread", format!("must be at most {MAX_STEP_SCALE}")));
        }
        if !(self.size_mean.is_finite() && self.size_mean > 0.0) {
            return Err(ConfigError::invalid("size_mean", "must be finite and > 0"));
        }
        Ok(())
    }
}

/// Random liquidity around the true price
#[derive(Debug, Clone)]
pub struct NoiseTrader {
    id: AgentId,
    name: String,
    config: NoiseTraderConfig,
    orders_generated: u64,
    arrivals: Option<Poisson<f64>>,
    sizes: Exp<f64>,
    rng: ChaCha8Rng,
}

impl NoiseTrader {
    pub fn new(id: AgentId, config: NoiseTraderConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        // Poisson needs a positive rate; zero intensity means no arrivals
        let arrivals = if config.intensity > 0.0 {
            Some(Poisson::new(config.intensity).map_err(|e| ConfigError::invalid("intensity", e.to_string()))?)
        } else {
            None
        };
        let sizes = Exp::new(1.0 / config.size_mean)
            .map_err(|e| ConfigError::invalid("size_mean", e.to_string()))?;

        Ok(Self {
            id,
            name: format!("noise-trader-{}", id.as_u32()),
            config,
            orders_generated: 0,
            arrivals,
            sizes,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Draw one random order around `true_price`. None if its price would
    /// not be positive.
    pub fn generate_order(&mut self, true_price: Price) -> Option<OrderRequest> {
        let side = if self.rng.gen_bool(0.5) { Side::BUY } else { Side::SELL };
        let noise: f64 = self.rng.sample(StandardNormal);
        let price = true_price.as_decimal()
            + offset(noise * self.config.spread, self.config.price_dp);
        let size: f64 = self.sizes.sample(&mut self.rng);
        let quantity = 1 + size.floor() as Quantity;

        let price = Price::try_new(price.round_dp(self.config.price_dp))?;
        Some(OrderRequest {
            side,
            price,
            quantity,
        })
    }

    pub fn orders_generated(&self) -> u64 {
        self.orders_generated
    }
}

impl TradingAgent for NoiseTrader {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, _tick: Tick, true_price: Price, _book: &OrderBook) -> AgentAction {
        let count = match &self.arrivals {
            Some(poisson) => poisson.sample(&mut self.rng) as u64,
            None => 0,
        };

        let orders: Vec<OrderRequest> = (0..count)
            .filter_map(|_| self.generate_order(true_price))
            .collect();
        self.orders_generated += orders.len() as u64;

        AgentAction {
            orders,
            ..AgentAction::default()
        }
    }
}
