//! Stochastic true price process
//!
//! Additive Gaussian random walk: `p[t+1] = p[t] + drift + volatility * Z`
//! with `Z ~ N(0, 1)` drawn from a process-owned seeded RNG. Values at or
//! below zero are clamped to a positive floor.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use types::errors::ConfigError;
use types::ids::Tick;
use types::numeric::Price;

/// Largest drift or volatility the process accepts, per tick
pub const MAX_STEP_SCALE: f64 = 1e9;

/// Bound on any single sampled step, far inside the `Decimal` range
const STEP_LIMIT: f64 = 1e15;

/// Convert a sampled f64 step to a `Decimal`
///
/// Steps beyond `STEP_LIMIT` are clamped to it and logged at `warn`.
pub(crate) fn sampled_step(value: f64) -> Decimal {
    let bounded = if value.is_nan() {
        0.0
    } else {
        value.clamp(-STEP_LIMIT, STEP_LIMIT)
    };
    if bounded != value {
        warn!(value, limit = STEP_LIMIT, "Clamping out-of-range step");
    }
    Decimal::from_f64(bounded).unwrap_or(Decimal::ZERO)
}

/// Configuration for the true price process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceProcessConfig {
    pub initial_price: Decimal,
    /// Deterministic change per tick
    pub drift: f64,
    /// Standard deviation of the per-tick shock
    pub volatility: f64,
    /// Lowest price the process may emit
    pub floor: Decimal,
    /// Decimal places generated prices are rounded to
    pub precision: u32,
}

impl Default for PriceProcessConfig {
    fn default() -> Self {
        Self {
            initial_price: Decimal::from(100),
            drift: 0.0,
            volatility: 0.5,
            floor: Decimal::new(1, 2),
            precision: 8,
        }
    }
}

impl PriceProcessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_price <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveInitialPrice(self.initial_price.to_string()));
        }
        if !(self.volatility.is_finite() && self.volatility > 0.0) {
            return Err(ConfigError::NonPositiveVolatility(self.volatility.to_string()));
        }
        if self.volatility > MAX_STEP_SCALE {
            return Err(ConfigError::invalid("volatility", format!("must be at most {MAX_STEP_SCALE}")));
        }
        if !(self.drift.is_finite() && self.drift.abs() <= MAX_STEP_SCALE) {
            return Err(ConfigError::invalid("drift", format!("must be finite and within ±{MAX_STEP_SCALE}")));
        }
        if self.floor <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveFloor(self.floor.to_string()));
        }
        if self.precision > 28 {
            return Err(ConfigError::invalid("precision", "at most 28 decimal places"));
        }
        Ok(())
    }
}

/// Seeded random walk over the true price
#[derive(Debug, Clone)]
pub struct PriceProcess {
    config: PriceProcessConfig,
    current: Price,
    /// Index = tick; history[0] is the initial price
    history: Vec<Price>,
    rng: ChaCha8Rng,
}

impl PriceProcess {
    /// Create a process with a deterministic seed.
    pub fn new(config: PriceProcessConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let current = Price::new(config.initial_price);
        Ok(Self {
            config,
            current,
            history: vec![current],
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Advance one tick and return the new true price.
    pub fn next_price(&mut self) -> Price {
        let z: f64 = self.rng.sample(StandardNormal);
        let shock = self.config.drift + self.config.volatility * z;
        let step = sampled_step(shock);

        let raw = (self.current.as_decimal() + step).round_dp(self.config.precision);
        let value = if raw < self.config.floor {
            debug!(
                tick = self.tick() + 1,
                raw = %raw,
                floor = %self.config.floor,
                "Clamping true price to floor"
            );
            self.config.floor
        } else {
            raw
        };

        self.current = Price::new(value);
        self.history.push(self.current);
        self.current
    }

    pub fn current(&self) -> Price {
        self.current
    }

    /// Every price so far, indexed by tick
    pub fn history(&self) -> &[Price] {
        &self.history
    }

    /// Number of steps taken
    pub fn tick(&self) -> Tick {
        (self.history.len() - 1) as Tick
    }

    pub fn config(&self) -> &PriceProcessConfig {
        &self.config
    }
}

impl Iterator for PriceProcess {
    type Item = Price;

    fn next(&mut self) -> Option<Price> {
        Some(self.next_price())
    }
}
