//! Simulation configuration
//!
//! One serde document describes a whole run: the master seed, the tick
//! count, the price process and the agent population. Per-agent seeds are
//! drawn from a ChaCha stream keyed by the master seed, so a config always
//! builds the same market.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use types::errors::ConfigError;
use types::ids::AgentId;

use crate::agents::{
    InformedTrader, InformedTraderConfig, MarketMaker, MarketMakerConfig, NoiseTrader, NoiseTraderConfig,
};
use crate::market::Market;
use crate::price::{PriceProcess, PriceProcessConfig};

/// Full description of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub ticks: u64,
    pub price: PriceProcessConfig,
    pub market_makers: Vec<MarketMakerConfig>,
    pub noise_traders: Vec<NoiseTraderConfig>,
    pub informed_traders: Vec<InformedTraderConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let maker = |half_spread: Decimal| MarketMakerConfig {
            half_spread,
            quote_size: 1,
            jitter: 0.05,
        };
        Self {
            seed: 1,
            ticks: 100,
            price: PriceProcessConfig::default(),
            market_makers: vec![maker(Decimal::new(5, 1)), maker(Decimal::new(6, 1))],
            noise_traders: vec![NoiseTraderConfig::default()],
            informed_traders: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every section without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.price.validate()?;
        for config in &self.market_makers {
            config.validate()?;
        }
        for config in &self.noise_traders {
            config.validate()?;
        }
        for config in &self.informed_traders {
            config.validate()?;
        }
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.market_makers.len() + self.noise_traders.len() + self.informed_traders.len()
    }

    /// Build a market with every configured agent registered.
    ///
    /// Agent ids are assigned from 1 in the order market makers, noise
    /// traders, informed traders, which is also the order they act in.
    pub fn build(&self) -> Result<Market, ConfigError> {
        self.validate()?;

        let mut seeds = ChaCha8Rng::seed_from_u64(self.seed);
        let mut market = Market::new(PriceProcess::new(self.price.clone(), seeds.next_u64())?);
        let mut next_id = 1u32;
        let mut assign = || {
            let id = AgentId::new(next_id);
            next_id += 1;
            id
        };

        for config in &self.market_makers {
            let agent = MarketMaker::new(assign(), config.clone(), seeds.next_u64())?;
            market.register(Box::new(agent))?;
        }
        for config in &self.noise_traders {
            let agent = NoiseTrader::new(assign(), config.clone(), seeds.next_u64())?;
            market.register(Box::new(agent))?;
        }
        for config in &self.informed_traders {
            let agent = InformedTrader::new(assign(), config.clone(), seeds.next_u64())?;
            market.register(Box::new(agent))?;
        }

        info!(
            seed = self.seed,
            ticks = self.ticks,
            agents = market.agent_count(),
            initial_price = %self.price.initial_price,
            "Built market from config"
        );
        Ok(market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builds() {
        let config = SimConfig::default();
        let market = config.build().unwrap();
        assert_eq!(market.agent_count(), 3);
        assert_eq!(market.tick(), 0);
    }

    #[test]
    fn test_agents_registered_in_section_order() {
        let config = SimConfig {
            informed_traders: vec![InformedTraderConfig::default()],
            ..Default::default()
        };
        let market = config.build().unwrap();
        let names: Vec<String> = market.agents().map(|a| a.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "market-maker-1",
                "market-maker-2",
                "noise-trader-3",
                "informed-trader-4",
            ]
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{"seed": 7, "ticks": 20}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.ticks, 20);
        assert_eq!(config.price, PriceProcessConfig::default());
        assert_eq!(config.market_makers.len(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SimConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_nested_sections_from_json() {
        let json = r#"{
            "price": {"initial_price": "50", "volatility": 0.25},
            "market_makers": [{"half_spread": "1", "quote_size": 10}],
            "noise_traders": []
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.price.initial_price, Decimal::from(50));
        assert_eq!(config.market_makers[0].quote_size, 10);
        assert_eq!(config.market_makers[0].jitter, 0.0);
        assert_eq!(config.build().unwrap().agent_count(), 1);
    }

    #[test]
    fn test_malformed_json() {
        let err = SimConfig::from_json("{ticks: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_section_fails_build() {
        let config = SimConfig {
            market_makers: vec![MarketMakerConfig {
                quote_size: 0,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(config.build().unwrap_err(), ConfigError::ZeroQuoteSize);

        let config = SimConfig {
            price: PriceProcessConfig {
                volatility: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveVolatility(_))));
    }

    #[test]
    fn test_same_seed_same_prices() {
        let mut a = SimConfig::default().build().unwrap();
        let mut b = SimConfig::default().build().unwrap();
        a.run(10);
        b.run(10);
        assert_eq!(a.history().prices(), b.history().prices());
    }
}
