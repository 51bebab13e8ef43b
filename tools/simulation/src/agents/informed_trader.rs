//! Informed trader bot
//!
//! Occasionally takes liquidity with a market sweep, either in a fixed
//! direction or a random one.

use matching_engine::{OrderBook, SweepReport};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use types::errors::ConfigError;
use types::ids::{AgentId, Tick};
use types::numeric::{Price, Quantity};
use types::order::{Side, SweepRequest};

use super::{AgentAction, TradingAgent};

/// Configuration for the informed trader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InformedTraderConfig {
    /// Probability of acting on a given tick
    pub activity_prob: f64,
    /// Size of each sweep
    pub size: Quantity,
    /// Forced direction; random when None
    pub direction: Option<Side>,
}

impl Default for InformedTraderConfig {
    fn default() -> Self {
        Self {
            activity_prob: 0.05,
            size: 5,
            direction: None,
        }
    }
}

impl InformedTraderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.activity_prob) {
            return Err(ConfigError::invalid("activity_prob", "must be within [0, 1]"));
        }
        if self.size == 0 {
            return Err(ConfigError::invalid("size", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InformedTrader {
    id: AgentId,
    name: String,
    config: InformedTraderConfig,
    executions: Vec<SweepReport>,
    rng: ChaCha8Rng,
}

impl InformedTrader {
    pub fn new(id: AgentId, config: InformedTraderConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            name: format!("informed-trader-{}", id.as_u32()),
            config,
            executions: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn executions(&self) -> &[SweepReport] {
        &self.executions
    }
}

impl TradingAgent for InformedTrader {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, _tick: Tick, _true_price: Price, _book: &OrderBook) -> AgentAction {
        if self.rng.gen::<f64>() >= self.config.activity_prob {
            return AgentAction::none();
        }
        let side = match self.config.direction {
            Some(side) => side,
            None if self.rng.gen_bool(0.5) => Side::BUY,
            None => Side::SELL,
        };
        AgentAction::sweep(SweepRequest {
            side,
            quantity: self.config.size,
        })
    }

    fn on_sweep(&mut self, report: &SweepReport) {
        self.executions.push(report.clone());
    }
}
