//! Types library for the market simulator
//!
//! Core type definitions shared by the order book and the simulation:
//! identifiers, fixed-point prices, orders, trades and the error taxonomy.
//!
//! # Modules
//! - `ids`: Sequence identifiers (OrderId, TradeId, AgentId) and `Tick`
//! - `numeric`: Fixed-point price type and integer quantities
//! - `order`: Order lifecycle types
//! - `trade`: Trade execution records
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;

