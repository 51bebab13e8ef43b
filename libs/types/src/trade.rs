//! Trade execution records
//!
//! A trade is created only by the matcher and never mutated afterwards.

use crate::ids::{AgentId, OrderId, Tick, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One side of an execution: the order and its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub order_id: OrderId,
    pub owner: AgentId,
}

/// An atomic exchange between a resting (maker) order and an incoming
/// (taker) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: AgentId,
    pub seller: AgentId,
    /// Side of the incoming order that triggered the execution
    pub aggressor: Side,
    /// Always the resting order's price
    pub price: Price,
    pub quantity: Quantity,
    pub tick: Tick,
}

impl Trade {
    /// Create a trade, routing maker/taker onto buy/sell by the aggressor side
    pub fn new(
        trade_id: TradeId,
        aggressor: Side,
        maker: Counterparty,
        taker: Counterparty,
        price: Price,
        quantity: Quantity,
        tick: Tick,
    ) -> Self {
        let (buy, sell) = match aggressor {
            Side::BUY => (taker, maker),
            Side::SELL => (maker, taker),
        };

        Self {
            trade_id,
            buy_order_id: buy.order_id,
            sell_order_id: sell.order_id,
            buyer: buy.owner,
            seller: sell.owner,
            aggressor,
            price,
            quantity,
            tick,
        }
    }

    /// The resting order that provided liquidity
    pub fn maker_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::BUY => self.sell_order_id,
            Side::SELL => self.buy_order_id,
        }
    }

    /// The incoming order that took liquidity
    pub fn taker_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::BUY => self.buy_order_id,
            Side::SELL => self.sell_order_id,
        }
    }

    /// Whether `agent` took part on either side
    pub fn involves(&self, agent: AgentId) -> bool {
        self.buyer == agent || self.seller == agent
    }

    /// Calculate trade value (price × quantity)
    pub fn trade_value(&self) -> Decimal {
        self.price.as_decimal() * Decimal::from(self.quantity)
    }
}
