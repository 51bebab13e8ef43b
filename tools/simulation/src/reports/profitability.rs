//! Profitability report
//!
//! Per-agent position, cash and mark-to-market PnL rebuilt from the trade
//! history and valued at a reference price (usually the final true price).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::ids::AgentId;
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// Per-agent profitability record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfit {
    pub agent_id: AgentId,
    pub bought: Quantity,
    pub sold: Quantity,
    /// Net position (positive = long)
    pub position: i64,
    pub cash: Decimal,
    /// Cash plus position valued at the reference price
    pub pnl: Decimal,
    pub trade_count: u64,
}

/// Aggregated profitability report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitabilityReport {
    pub mark_price: Price,
    /// Ordered by agent id
    pub agents: Vec<AgentProfit>,
    pub total_volume: Quantity,
}

/// Internal accumulator for an agent.
#[derive(Debug, Default)]
struct AgentAccum {
    bought: Quantity,
    sold: Quantity,
    cash: Decimal,
    trade_count: u64,
}

/// Generate a profitability report from executed trades.
pub fn analyze(trades: &[Trade], mark_price: Price) -> ProfitabilityReport {
    let mut agents: BTreeMap<AgentId, AgentAccum> = BTreeMap::new();

    for trade in trades {
        let value = trade.trade_value();

        let buyer = agents.entry(trade.buyer).or_default();
        buyer.bought += trade.quantity;
        buyer.cash -= value;
        buyer.trade_count += 1;

        let seller = agents.entry(trade.seller).or_default();
        seller.sold += trade.quantity;
        seller.cash += value;
        seller.trade_count += 1;
    }

    let agents = agents
        .into_iter()
        .map(|(agent_id, acc)| {
            let position = acc.bought as i64 - acc.sold as i64;
            AgentProfit {
                agent_id,
                bought: acc.bought,
                sold: acc.sold,
                position,
                cash: acc.cash,
                pnl: acc.cash + Decimal::from(position) * mark_price.as_decimal(),
                trade_count: acc.trade_count,
            }
        })
        .collect();

    ProfitabilityReport {
        mark_price,
        agents,
        total_volume: trades.iter().map(|t| t.quantity).sum(),
    }
}

impl ProfitabilityReport {
    pub fn agent(&self, agent_id: AgentId) -> Option<&AgentProfit> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Sum of all agents' PnL. Trading is zero-sum, so this is always zero.
    pub fn net_pnl(&self) -> Decimal {
        self.agents.iter().map(|a| a.pnl).sum()
    }
}
